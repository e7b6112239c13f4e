//! Error types for period and timestamp parsing.

/// Errors that can occur while interpreting period tokens and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error("unknown period '{0}' (expected 7d, 30d, 90d, or ytd)")]
    UnknownPeriod(String),

    #[error("unknown bucket granularity '{0}' (expected day, week, or month)")]
    UnknownGranularity(String),

    #[error("invalid timestamp '{0}': expected RFC 3339 or YYYY-MM-DD")]
    InvalidTimestamp(String),
}
