//! Time source and calendar-day bucketing
//!
//! All "calendar day" comparisons (streaks, pact days, daily badge
//! queries) use UTC day buckets in "YYYY-MM-DD" form. The engine reads the
//! current time through the [`Clock`] trait so tests can drive dates
//! deterministically.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

/// Supplies "now" to the engine.
pub trait Clock: Send + Sync {
    /// Current time as ms since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Compute the day bucket string from a Unix timestamp in milliseconds.
///
/// Returns a string in format "YYYY-MM-DD" (UTC).
pub fn day_bucket(timestamp_ms: i64) -> String {
    let dt = DateTime::from_timestamp_millis(timestamp_ms).unwrap_or_else(Utc::now);
    format!("{:04}-{:02}-{:02}", dt.year(), dt.month(), dt.day())
}

/// Parse a day bucket string back to a `NaiveDate`.
pub fn parse_day_bucket(bucket: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(bucket, "%Y-%m-%d").ok()
}

/// Whole calendar days from `earlier` to `later` (negative if reversed).
pub fn days_between(earlier: &str, later: &str) -> Option<i64> {
    let a = parse_day_bucket(earlier)?;
    let b = parse_day_bucket(later)?;
    Some((b - a).num_days())
}

/// Hour of day (0-23, UTC) for a timestamp.
pub fn hour_of(timestamp_ms: i64) -> u32 {
    let dt = DateTime::from_timestamp_millis(timestamp_ms).unwrap_or_else(Utc::now);
    dt.hour()
}

/// Timestamp (ms) for midnight UTC at the start of the given bucket.
pub fn day_start_ms(bucket: &str) -> Option<i64> {
    parse_day_bucket(bucket)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bucket() {
        // 2023-12-28 12:34:56 UTC
        let ts = 1703766896000i64;
        assert_eq!(day_bucket(ts), "2023-12-28");
        assert_eq!(hour_of(ts), 12);
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between("2024-03-01", "2024-03-02"), Some(1));
        assert_eq!(days_between("2024-02-28", "2024-03-01"), Some(2)); // leap year
        assert_eq!(days_between("2024-03-02", "2024-03-01"), Some(-1));
        assert_eq!(days_between("garbage", "2024-03-01"), None);
    }

    #[test]
    fn test_day_start_roundtrip() {
        let ts = day_start_ms("2023-12-28").unwrap();
        assert_eq!(day_bucket(ts), "2023-12-28");
        assert_eq!(hour_of(ts), 0);
    }
}
