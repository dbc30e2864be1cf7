use chrono::{DateTime, FixedOffset};

pub struct TimeUtils;

impl TimeUtils {
    pub const SECS_IN_H: i32 = 3600;
    pub const CLOCK_FORMAT: &str = "%H:%M:%S";
}

/// Format a virtual timestamp as `HH:MM:SS` in a fixed UTC offset.
/// Out-of-range input yields an empty string rather than an error: labels are cosmetic.
pub fn format_clock(timestamp_ms: f64, utc_offset_hours: i32) -> String {
    if !timestamp_ms.is_finite() {
        return String::new();
    }
    let Some(offset) = FixedOffset::east_opt(utc_offset_hours * TimeUtils::SECS_IN_H) else {
        return String::new();
    };
    match DateTime::from_timestamp_millis(timestamp_ms.floor() as i64) {
        Some(utc) => utc
            .with_timezone(&offset)
            .format(TimeUtils::CLOCK_FORMAT)
            .to_string(),
        None => String::new(),
    }
}

/// Clock text followed by the timezone label, e.g. `09:00:05 UTC+9`.
pub fn format_clock_with_zone(timestamp_ms: f64, utc_offset_hours: i32, zone: &str) -> String {
    let clock = format_clock(timestamp_ms, utc_offset_hours);
    if zone.is_empty() {
        clock
    } else {
        format!("{clock} {zone}")
    }
}
