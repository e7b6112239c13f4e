//! Timestamp parsing for the shapes rows arrive in.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::error::PeriodError;

/// Parse a timestamp into UTC.
///
/// Accepted forms:
/// - RFC 3339 (`2026-10-19T08:30:00Z`, `2026-10-19T08:30:00+02:00`)
/// - SQL style with offset (`2026-10-19 08:30:00+00`)
/// - naive date-time, read as UTC (`2026-10-19T08:30:00`)
/// - bare date, read as UTC midnight (`2026-10-19`)
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, PeriodError> {
    parse_timestamp_local(s).map(|dt| dt.with_timezone(&Utc))
}

/// Like [`parse_timestamp`] but keeps the offset the timestamp was written
/// with, so `date_naive()` is the calendar day as written. Naive forms get
/// a zero offset.
pub fn parse_timestamp_local(s: &str) -> Result<DateTime<FixedOffset>, PeriodError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(dt);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    Err(PeriodError::InvalidTimestamp(s.to_string()))
}
