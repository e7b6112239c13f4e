//! Z-score anomaly detection over daily metric series.
//!
//! The detector is batch-only: it takes a whole series, computes its mean
//! and sample standard deviation, and flags points at least `sigma`
//! standard deviations away from the mean. Too-short and constant series
//! produce an empty result rather than an error.

pub mod detect;
pub mod series;
pub mod sigma;
pub mod stats;

pub use detect::{AnomalyResult, DetectionResult, Direction, MIN_POINTS, detect_anomalies};
pub use series::{TimeSeriesPoint, daily_series};
pub use sigma::{Sigma, SigmaError};
pub use stats::SeriesStats;
