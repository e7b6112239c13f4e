//! Daily time series.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// One value per calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Sum timestamped rows per calendar day.
///
/// A row counts toward its date in its own time zone, so a row stamped
/// `2026-10-01T23:30:00-05:00` lands on Oct 1. Pass `DateTime<Utc>` rows to
/// bucket by UTC day instead.
///
/// The result is ascending by date with one point per day that has at
/// least one row; days without rows are not filled in.
pub fn daily_series<Tz, I>(rows: I) -> Vec<TimeSeriesPoint>
where
    Tz: TimeZone,
    I: IntoIterator<Item = (DateTime<Tz>, f64)>,
{
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (at, value) in rows {
        *days.entry(at.date_naive()).or_insert(0.0) += value;
    }
    days.into_iter()
        .map(|(date, value)| TimeSeriesPoint { date, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sums_rows_per_day_in_order() {
        let rows = vec![
            (Utc.with_ymd_and_hms(2026, 10, 2, 23, 0, 0).unwrap(), 5.0),
            (Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap(), 100.0),
            (Utc.with_ymd_and_hms(2026, 10, 1, 17, 30, 0).unwrap(), 20.0),
        ];
        assert_eq!(
            daily_series(rows),
            vec![
                TimeSeriesPoint::new(day(2026, 10, 1), 120.0),
                TimeSeriesPoint::new(day(2026, 10, 2), 5.0),
            ]
        );
    }

    #[test]
    fn rows_keep_their_written_day() {
        let cdt = FixedOffset::west_opt(5 * 3600).unwrap();
        let rows = vec![
            (cdt.with_ymd_and_hms(2026, 10, 1, 23, 30, 0).unwrap(), 7.0),
            (cdt.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap(), 3.0),
        ];
        assert_eq!(daily_series(rows), vec![TimeSeriesPoint::new(day(2026, 10, 1), 10.0)]);
    }

    #[test]
    fn empty_rows() {
        assert!(daily_series(Vec::<(DateTime<Utc>, f64)>::new()).is_empty());
    }

    #[test]
    fn point_json_shape() {
        let p: TimeSeriesPoint = serde_json::from_str(r#"{"date": "2026-10-19", "value": 3}"#).unwrap();
        assert_eq!(p, TimeSeriesPoint::new(day(2026, 10, 19), 3.0));
    }
}
