//! Sigma thresholds.

use std::fmt;

/// Errors for out-of-range sigma thresholds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SigmaError {
    #[error("sigma must be between {min} and {max} (got {value})")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("sigma must be a finite number")]
    NotFinite,
}

/// A z-score magnitude threshold validated against a range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Sigma(f64);

impl Sigma {
    pub const DEFAULT: Sigma = Sigma(2.0);
    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 5.0;

    /// Validate against the default `1..=5` range.
    pub fn new(value: f64) -> Result<Self, SigmaError> {
        Self::bounded(value, Self::MIN, Self::MAX)
    }

    /// Validate against `min..=max`.
    pub fn bounded(value: f64, min: f64, max: f64) -> Result<Self, SigmaError> {
        if !value.is_finite() {
            return Err(SigmaError::NotFinite);
        }
        if value < min || value > max {
            return Err(SigmaError::OutOfRange { value, min, max });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Sigma {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Sigma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
