pub mod calendar;
pub mod duration;
pub mod extractor;
pub mod report;

pub use calendar::{BusinessCalendar, Workdays};
pub use duration::{DurationFormatter, EMPTY_CELL, format_duration};
pub use extractor::{COLUMN_HEADERS, MetricRow, MetricsExtractor};
pub use report::{PullRequestSource, Report, SearchQuery, build_report};
