//! Summary statistics.

/// Mean and sample standard deviation of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
}

impl SeriesStats {
    /// Compute statistics; `None` for fewer than two values.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let count = values.len();
        if count < 2 {
            return None;
        }

        // Rounding in the mean would give identical values a tiny spread.
        if values.iter().all(|v| *v == values[0]) {
            return Some(Self {
                count,
                mean: values[0],
                std_dev: 0.0,
            });
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        let std_dev = (sum_sq / (count - 1) as f64).sqrt();

        Some(Self {
            count,
            mean,
            std_dev,
        })
    }

    /// Signed number of standard deviations `value` lies from the mean.
    /// `0` when the series has no spread.
    pub fn z_score(&self, value: f64) -> f64 {
        if self.std_dev == 0.0 {
            return 0.0;
        }
        (value - self.mean) / self.std_dev
    }
}
