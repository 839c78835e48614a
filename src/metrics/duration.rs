use chrono::Duration;

/// Placeholder for a metric that cannot be computed.
pub const EMPTY_CELL: &str = "--";

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Renders durations either for humans (`1h12m`) or for CSV (`01:12`).
///
/// Durations are rounded to the nearest minute, halves away from zero.
/// The sign is dropped: a negative duration renders like its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationFormatter {
    csv: bool,
}

impl DurationFormatter {
    pub fn new(csv: bool) -> Self {
        Self { csv }
    }

    pub fn format(&self, duration: Duration) -> String {
        format_duration(duration, self.csv)
    }

    /// `format` for a computed value, the sentinel otherwise.
    pub fn format_opt(&self, duration: Option<Duration>) -> String {
        duration
            .map(|d| self.format(d))
            .unwrap_or_else(|| EMPTY_CELL.to_string())
    }
}

pub fn format_duration(duration: Duration, csv: bool) -> String {
    let minutes = rounded_minutes(duration);
    let (hours, minutes) = (minutes / 60, minutes % 60);

    if csv {
        return format!("{hours:02}:{minutes:02}");
    }
    if hours == 0 && minutes == 0 {
        return EMPTY_CELL.to_string();
    }
    if hours > 0 {
        format!("{hours}h{minutes}m")
    } else {
        format!("{minutes}m")
    }
}

fn rounded_minutes(duration: Duration) -> i64 {
    let millis = duration.abs().num_milliseconds();
    (millis + MILLIS_PER_MINUTE / 2) / MILLIS_PER_MINUTE
}
