use chrono::{DateTime, Utc};

/// Placeholder shown for values that cannot be displayed.
pub const MISSING: &str = "_";

/// `3645` -> `"1h 0m 45s"`. Negative input renders as `"_"`.
pub fn format_seconds(seconds: i64) -> String {
    if seconds < 0 {
        return MISSING.to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{}h {}m {}s", hours, minutes, secs)
}

/// Durations under a second keep millisecond precision; longer ones use
/// [`format_seconds`] with the remainder truncated.
pub fn format_ms(millis: u64) -> String {
    if millis < 1000 {
        return format!("{}ms", millis);
    }
    format_seconds(i64::try_from(millis / 1000).unwrap_or(i64::MAX))
}

/// Unix milliseconds rendered as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(unix_millis: i64) -> String {
    if unix_millis <= 0 {
        return MISSING.to_string();
    }
    match DateTime::<Utc>::from_timestamp_millis(unix_millis) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => MISSING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(-4), "_");
        assert_eq!(format_seconds(0), "0h 0m 0s");
        assert_eq!(format_seconds(65), "0h 1m 5s");
        assert_eq!(format_seconds(3645), "1h 0m 45s");
        assert_eq!(format_seconds(90061), "25h 1m 1s");
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(0), "0ms");
        assert_eq!(format_ms(999), "999ms");
        assert_eq!(format_ms(1000), "0h 0m 1s");
        assert_eq!(format_ms(65_432), "0h 1m 5s");
    }

    #[test]
    fn test_format_ms_never_wraps_negative() {
        let rendered = format_ms(u64::MAX);
        assert_ne!(rendered, MISSING);
        assert!(rendered.starts_with("5124095576030h"));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "_");
        assert_eq!(format_timestamp(1_700_000_000_000), "2023-11-14 22:13:20 UTC");
    }
}
