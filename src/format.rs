//! Display helpers for server timestamps.
//!
//! The backend sends either RFC 3339 strings or naive local date-times
//! (`2024-05-01T10:00:00.123`). Naive values are read in the local zone.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

const MS_PER_MINUTE: i64 = 1000 * 60;
const MS_PER_HOUR: i64 = MS_PER_MINUTE * 60;
const MS_PER_DAY: i64 = MS_PER_HOUR * 24;

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}

/// Absolute local time as `dd/mm/YYYY HH:MM`. Unparseable input is returned
/// as-is.
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        None => raw.to_string(),
    }
}

/// Coarse "time since" label using floor division of the elapsed time.
pub fn time_since(raw: &str, now: DateTime<Local>) -> Option<String> {
    let then = parse_timestamp(raw)?;
    Some(elapsed_label((now - then).num_milliseconds()))
}

pub fn elapsed_label(elapsed_ms: i64) -> String {
    let days = elapsed_ms.div_euclid(MS_PER_DAY);
    let hours = elapsed_ms.div_euclid(MS_PER_HOUR);
    let minutes = elapsed_ms.div_euclid(MS_PER_MINUTE);

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        "just now".to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ago(now: DateTime<Local>, delta: Duration) -> String {
        (now - delta).to_rfc3339()
    }

    #[test]
    fn thirty_seconds_is_just_now() {
        let now = Local::now();
        assert_eq!(
            time_since(&ago(now, Duration::seconds(30)), now).as_deref(),
            Some("just now")
        );
    }

    #[test]
    fn ninety_minutes_is_one_hour() {
        let now = Local::now();
        assert_eq!(
            time_since(&ago(now, Duration::minutes(90)), now).as_deref(),
            Some("1 hour ago")
        );
    }

    #[test]
    fn two_days_is_pluralized() {
        let now = Local::now();
        assert_eq!(
            time_since(&ago(now, Duration::days(2)), now).as_deref(),
            Some("2 days ago")
        );
    }

    #[test]
    fn minute_bucket() {
        assert_eq!(elapsed_label(MS_PER_MINUTE), "1 minute ago");
        assert_eq!(elapsed_label(59 * MS_PER_MINUTE + 59_999), "59 minutes ago");
    }

    #[test]
    fn future_timestamps_are_just_now() {
        assert_eq!(elapsed_label(-5 * MS_PER_HOUR), "just now");
    }

    #[test]
    fn naive_timestamps_are_local() {
        let now = Local::now();
        let raw = (now - Duration::hours(3))
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.f")
            .to_string();
        assert_eq!(time_since(&raw, now).as_deref(), Some("3 hours ago"));
    }

    #[test]
    fn format_timestamp_uses_day_month_year() {
        assert_eq!(format_timestamp("2024-05-01T09:05:00"), "01/05/2024 09:05");
        assert_eq!(format_timestamp("2024-12-31T23:59:59.123456"), "31/12/2024 23:59");
    }

    #[test]
    fn unparseable_timestamps_pass_through() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert!(time_since("yesterday", Local::now()).is_none());
    }
}
