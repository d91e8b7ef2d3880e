//! Timestamp persistence format and julian-day arithmetic.
//!
//! Timestamps are stored as UTC RFC-3339 with millisecond precision
//! (`2026-08-01T06:42:00.123Z`), the same shape SQLite's
//! `strftime('%Y-%m-%dT%H:%M:%fZ', ...)` emits, so lexicographic comparison
//! in SQL is chronological.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

use crate::errors::{EngramError, EngramResult};

/// Format a timestamp in the canonical persistence form.
pub fn format_utc(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a persisted timestamp. Accepts RFC-3339 and the bare
/// `YYYY-MM-DD HH:MM:SS` form SQLite's `datetime('now')` produces, so
/// databases touched by older tooling remain readable.
pub fn parse_utc(s: &str) -> EngramResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    Err(EngramError::Io {
        message: format!("unparseable timestamp: {s}"),
    })
}

/// Julian day number for a UTC instant.
pub fn julian_day(dt: DateTime<Utc>) -> f64 {
    let secs = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_millis()) / 1000.0;
    secs / 86_400.0 + 2_440_587.5
}

/// Whole days elapsed between two instants, floored, never negative.
pub fn age_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let days = (julian_day(now) - julian_day(created_at)).floor() as i64;
    days.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn format_round_trips() {
        let now = Utc::now();
        let parsed = parse_utc(&format_utc(now)).unwrap();
        assert!((now - parsed).num_milliseconds().abs() <= 1);
    }

    #[test]
    fn parses_sqlite_datetime_form() {
        let dt = parse_utc("2026-01-20 12:30:00").unwrap();
        assert_eq!(format_utc(dt), "2026-01-20T12:30:00.000Z");
    }

    #[test]
    fn age_floors_and_clamps() {
        let now = Utc::now();
        assert_eq!(age_days(now, now), 0);
        assert_eq!(age_days(now - Duration::hours(47), now), 1);
        assert_eq!(age_days(now - Duration::days(61), now), 61);
        // Clock skew never yields negative ages.
        assert_eq!(age_days(now + Duration::days(2), now), 0);
    }
}
