use chrono::Duration;
use gh_metrics::metrics::{DurationFormatter, EMPTY_CELL, format_duration};

#[test]
fn test_less_than_minute() {
    assert_eq!(format_duration(Duration::seconds(5), false), EMPTY_CELL);
}

#[test]
fn test_less_than_minute_csv() {
    assert_eq!(format_duration(Duration::seconds(5), true), "00:00");
}

#[test]
fn test_zero() {
    assert_eq!(format_duration(Duration::zero(), false), "--");
    assert_eq!(format_duration(Duration::zero(), true), "00:00");
}

#[test]
fn test_more_than_minute() {
    assert_eq!(format_duration(Duration::minutes(5), false), "5m");
}

#[test]
fn test_more_than_minute_csv() {
    assert_eq!(format_duration(Duration::minutes(5), true), "00:05");
}

#[test]
fn test_hours_and_minutes() {
    let d = Duration::hours(1) + Duration::minutes(12);
    assert_eq!(format_duration(d, false), "1h12m");
    assert_eq!(format_duration(d, true), "01:12");
}

#[test]
fn test_whole_hours_keep_minutes() {
    assert_eq!(format_duration(Duration::hours(24), false), "24h0m");
}

#[test]
fn test_hours_not_wrapped_to_days() {
    let d = Duration::hours(38) + Duration::minutes(13);
    assert_eq!(format_duration(d, true), "38:13");
    assert_eq!(format_duration(d, false), "38h13m");
}

#[test]
fn test_rounds_half_up() {
    assert_eq!(format_duration(Duration::seconds(30), false), "1m");
    assert_eq!(format_duration(Duration::seconds(29), false), "--");
    assert_eq!(format_duration(Duration::seconds(89), true), "00:01");
    assert_eq!(format_duration(Duration::seconds(90), true), "00:02");
}

#[test]
fn test_rounding_carries_into_hours() {
    let d = Duration::hours(23) + Duration::minutes(59) + Duration::seconds(59);
    assert_eq!(format_duration(d, false), "24h0m");
    assert_eq!(format_duration(d, true), "24:00");
}

#[test]
fn test_negative_renders_magnitude() {
    let d = -(Duration::hours(6) + Duration::minutes(50) + Duration::seconds(47));
    assert_eq!(format_duration(d, true), "06:51");
    assert_eq!(format_duration(d, false), "6h51m");
}

#[test]
fn test_negative_under_minute() {
    assert_eq!(format_duration(Duration::seconds(-10), false), "--");
    assert_eq!(format_duration(Duration::seconds(-10), true), "00:00");
}

#[test]
fn test_idempotent_on_aligned_durations() {
    let d = Duration::minutes(187);
    let formatter = DurationFormatter::new(false);
    assert_eq!(formatter.format(d), formatter.format(d));
    assert_eq!(formatter.format(d), "3h7m");
}

#[test]
fn test_format_opt_missing_is_sentinel() {
    assert_eq!(DurationFormatter::new(false).format_opt(None), EMPTY_CELL);
    assert_eq!(DurationFormatter::new(true).format_opt(None), EMPTY_CELL);
    assert_eq!(
        DurationFormatter::new(true).format_opt(Some(Duration::minutes(61))),
        "01:01"
    );
}
