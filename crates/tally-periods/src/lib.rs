//! Reporting periods and chart time buckets.
//!
//! A [`Period`] (`7d`, `30d`, `90d`, `ytd`) is split into contiguous
//! [`Bucket`]s whose width comes from a [`BucketPolicy`]. Callers attach
//! their own aggregates with [`Bucketed`] and route rows to buckets with
//! [`find_bucket_index`].
//!
//! Every function has an `*_at` variant taking an explicit "now" so
//! results are reproducible.

pub mod bucket;
pub mod error;
pub mod period;
pub mod timestamp;

pub use bucket::{
    Bucket, BucketPolicy, Bucketed, Granularity, accumulate, find_bucket_index,
    find_bucket_index_str, time_buckets, time_buckets_at, with_aggregates,
};
pub use error::PeriodError;
pub use period::{Period, period_start, period_start_at};
pub use timestamp::{parse_timestamp, parse_timestamp_local};
