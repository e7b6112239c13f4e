//! Chart time buckets.
//!
//! Buckets for a period are contiguous and gap-free: `buckets[i].end ==
//! buckets[i + 1].start`, the first bucket starts at the period start, and
//! the last one ends at "now". The last bucket is clamped rather than
//! rounded up, so bucket widths are not uniform.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PeriodError;
use crate::period::Period;
use crate::timestamp::parse_timestamp;

/// Width of one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// The instant one bucket after `from`, if representable.
    fn step(self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Day => from.checked_add_signed(TimeDelta::days(1)),
            Self::Week => from.checked_add_signed(TimeDelta::weeks(1)),
            Self::Month => from.checked_add_months(Months::new(1)),
        }
    }

    fn label(self, start: DateTime<Utc>) -> String {
        match self {
            Self::Day | Self::Week => start.format("%b %d").to_string(),
            Self::Month => start.format("%b %Y").to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(PeriodError::UnknownGranularity(s.to_string())),
        }
    }
}

/// Bucket width per period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketPolicy {
    #[serde(rename = "7d", default = "day")]
    pub last_7_days: Granularity,

    #[serde(rename = "30d", default = "day")]
    pub last_30_days: Granularity,

    #[serde(rename = "90d", default = "week")]
    pub last_90_days: Granularity,

    #[serde(rename = "ytd", default = "month")]
    pub year_to_date: Granularity,
}

impl Default for BucketPolicy {
    fn default() -> Self {
        Self {
            last_7_days: Granularity::Day,
            last_30_days: Granularity::Day,
            last_90_days: Granularity::Week,
            year_to_date: Granularity::Month,
        }
    }
}

fn day() -> Granularity {
    Granularity::Day
}

fn week() -> Granularity {
    Granularity::Week
}

fn month() -> Granularity {
    Granularity::Month
}

impl BucketPolicy {
    pub fn granularity(&self, period: Period) -> Granularity {
        match period {
            Period::Last7Days => self.last_7_days,
            Period::Last30Days => self.last_30_days,
            Period::Last90Days => self.last_90_days,
            Period::YearToDate => self.year_to_date,
        }
    }

    /// The same policy with `period` bucketed by `granularity`.
    pub fn with_granularity(mut self, period: Period, granularity: Granularity) -> Self {
        let slot = match period {
            Period::Last7Days => &mut self.last_7_days,
            Period::Last30Days => &mut self.last_30_days,
            Period::Last90Days => &mut self.last_90_days,
            Period::YearToDate => &mut self.year_to_date,
        };
        *slot = granularity;
        self
    }
}

/// A half-open time interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Bucket {
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }
}

impl AsRef<Bucket> for Bucket {
    fn as_ref(&self) -> &Bucket {
        self
    }
}

/// A bucket with a caller-defined aggregate attached.
///
/// Both parts are flattened when serialized, so
/// `Bucketed<RevenueTotals>` renders as
/// `{"label": ..., "start": ..., "end": ..., "value": 0, "count": 0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucketed<A> {
    #[serde(flatten)]
    pub bucket: Bucket,
    #[serde(flatten)]
    pub aggregate: A,
}

impl<A> AsRef<Bucket> for Bucketed<A> {
    fn as_ref(&self) -> &Bucket {
        &self.bucket
    }
}

/// Attach a zeroed (`Default`) aggregate to every bucket.
pub fn with_aggregates<A: Default>(buckets: &[Bucket]) -> Vec<Bucketed<A>> {
    buckets
        .iter()
        .map(|b| Bucketed {
            bucket: b.clone(),
            aggregate: A::default(),
        })
        .collect()
}

/// Fold timestamped rows into the aggregates of the buckets they fall in.
///
/// Rows outside every bucket are skipped; returns how many were skipped.
pub fn accumulate<A, T, I, F>(buckets: &mut [Bucketed<A>], rows: I, mut fold: F) -> usize
where
    I: IntoIterator<Item = (DateTime<Utc>, T)>,
    F: FnMut(&mut A, T),
{
    let mut skipped = 0;
    for (at, row) in rows {
        match find_bucket_index(buckets, at) {
            Some(idx) => fold(&mut buckets[idx].aggregate, row),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, "rows outside bucket range");
    }
    skipped
}

/// Buckets for `period` ending at the current time, with the default policy.
pub fn time_buckets(period: Period) -> Vec<Bucket> {
    time_buckets_at(period, Utc::now(), &BucketPolicy::default())
}

/// Buckets for `period` ending at `now`.
///
/// Always returns at least one bucket.
pub fn time_buckets_at(period: Period, now: DateTime<Utc>, policy: &BucketPolicy) -> Vec<Bucket> {
    let granularity = policy.granularity(period);
    let mut cursor = period.start_at(now);
    let mut buckets = Vec::new();

    loop {
        let end = granularity.step(cursor).map_or(now, |next| next.min(now));
        buckets.push(Bucket {
            label: granularity.label(cursor),
            start: cursor,
            end,
        });
        if end >= now {
            break;
        }
        cursor = end;
    }

    debug!(%period, %granularity, count = buckets.len(), "generated time buckets");
    buckets
}

/// Index of the bucket containing `t`, or `None` when `t` is before the
/// first bucket or at/after the last bucket's end.
pub fn find_bucket_index<B: AsRef<Bucket>>(buckets: &[B], t: DateTime<Utc>) -> Option<usize> {
    let after = buckets.partition_point(|b| b.as_ref().start <= t);
    let idx = after.checked_sub(1)?;
    buckets[idx].as_ref().contains(t).then_some(idx)
}

/// Like [`find_bucket_index`] for a timestamp string. Unparseable
/// timestamps match no bucket.
pub fn find_bucket_index_str<B: AsRef<Bucket>>(buckets: &[B], timestamp: &str) -> Option<usize> {
    match parse_timestamp(timestamp) {
        Ok(t) => find_bucket_index(buckets, t),
        Err(e) => {
            debug!(error = %e, "timestamp matches no bucket");
            None
        }
    }
}
