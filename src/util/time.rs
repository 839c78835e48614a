use chrono::{Days, NaiveDate};

use crate::error::MetricsError;
use crate::metrics::report::DATE_FORMAT;

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, MetricsError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| MetricsError::InvalidDate(value.to_string()))
}

/// Resolve the merged-date window. `end` defaults to `today` and `start`
/// to `days_back` days before `end`.
pub fn resolve_date_range(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
    days_back: u32,
) -> Result<(NaiveDate, NaiveDate), MetricsError> {
    let end = end.map(parse_date).transpose()?.unwrap_or(today);
    let start = match start {
        Some(s) => parse_date(s)?,
        None => end
            .checked_sub_days(Days::new(days_back.into()))
            .unwrap_or(NaiveDate::MIN),
    };

    if start > end {
        return Err(MetricsError::InvalidDateRange {
            start: start.format(DATE_FORMAT).to_string(),
            end: end.format(DATE_FORMAT).to_string(),
        });
    }
    Ok((start, end))
}
