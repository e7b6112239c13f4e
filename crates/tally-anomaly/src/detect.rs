//! Batch z-score detection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::series::TimeSeriesPoint;
use crate::stats::SeriesStats;

/// Series shorter than this are not judged.
pub const MIN_POINTS: usize = 3;

/// Which side of the mean an anomaly lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
}

/// A flagged point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyResult {
    /// Position in the input series.
    pub index: usize,
    pub date: NaiveDate,
    pub value: f64,
    /// Signed; positive means above the mean.
    pub z_score: f64,
}

impl AnomalyResult {
    pub fn direction(&self) -> Direction {
        if self.z_score >= 0.0 {
            Direction::Above
        } else {
            Direction::Below
        }
    }
}

/// Outcome of [`detect_anomalies`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub anomalies: Vec<AnomalyResult>,
    pub mean: f64,
    pub std_dev: f64,
}

impl DetectionResult {
    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }
}

/// Flag points whose z-score magnitude is at least `sigma`.
///
/// - fewer than [`MIN_POINTS`] points: empty result with zero mean and
///   standard deviation,
/// - constant series: mean is reported, no anomalies,
/// - otherwise anomalies are returned in series order.
pub fn detect_anomalies(series: &[TimeSeriesPoint], sigma: f64) -> DetectionResult {
    if series.len() < MIN_POINTS {
        debug!(points = series.len(), "too few points for anomaly detection");
        return DetectionResult::default();
    }

    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    let Some(stats) = SeriesStats::compute(&values) else {
        return DetectionResult::default();
    };

    if stats.std_dev == 0.0 {
        debug!(mean = stats.mean, "constant series, no anomalies");
        return DetectionResult {
            anomalies: Vec::new(),
            mean: stats.mean,
            std_dev: 0.0,
        };
    }

    let anomalies: Vec<AnomalyResult> = series
        .iter()
        .enumerate()
        .filter_map(|(index, point)| {
            let z_score = stats.z_score(point.value);
            (z_score.abs() >= sigma).then_some(AnomalyResult {
                index,
                date: point.date,
                value: point.value,
                z_score,
            })
        })
        .collect();

    debug!(
        points = series.len(),
        sigma,
        flagged = anomalies.len(),
        "anomaly detection complete"
    );

    DetectionResult {
        anomalies,
        mean: stats.mean,
        std_dev: stats.std_dev,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn series(values: &[f64]) -> Vec<TimeSeriesPoint> {
        let start = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        values
            .iter()
            .zip(start.iter_days())
            .map(|(&value, date)| TimeSeriesPoint { date, value })
            .collect()
    }

    #[test]
    fn flags_single_spike() {
        let s = series(&[10.0, 12.0, 11.0, 13.0, 95.0, 12.0, 11.0]);
        let result = detect_anomalies(&s, 2.0);

        assert_eq!(result.anomalies.len(), 1);
        let spike = &result.anomalies[0];
        assert_eq!(spike.index, 4);
        assert_eq!(spike.value, 95.0);
        assert_eq!(spike.date, NaiveDate::from_ymd_opt(2026, 10, 5).unwrap());
        assert!(spike.z_score >= 2.0);
        assert_eq!(spike.direction(), Direction::Above);
        assert!((result.mean - 164.0 / 7.0).abs() < 1e-9);
        assert!(result.std_dev > 0.0);
    }

    #[test]
    fn constant_series_has_no_anomalies() {
        let s = series(&[5.0, 5.0, 5.0, 5.0, 5.0]);
        for sigma in [0.0, 1.0, 2.0, 5.0] {
            let result = detect_anomalies(&s, sigma);
            assert_eq!(result.std_dev, 0.0);
            assert!(result.anomalies.is_empty());
            assert_eq!(result.mean, 5.0);
        }
    }

    #[test]
    fn inexact_constant_series_has_no_anomalies() {
        let s = series(&[0.1, 0.1, 0.1]);
        for sigma in [0.0, 0.5, 2.0] {
            let result = detect_anomalies(&s, sigma);
            assert_eq!(result.std_dev, 0.0);
            assert_eq!(result.mean, 0.1);
            assert!(result.anomalies.is_empty());
        }
    }

    #[test]
    fn too_few_points() {
        let s = series(&[1.0, 100.0]);
        assert_eq!(detect_anomalies(&s, 1.0), DetectionResult::default());
        assert_eq!(detect_anomalies(&[], 1.0), DetectionResult::default());
    }

    #[test]
    fn threshold_is_inclusive() {
        // mean 2, sample sd 1: the endpoints sit exactly one sd away.
        let s = series(&[1.0, 2.0, 3.0]);
        let result = detect_anomalies(&s, 1.0);
        let idx: Vec<usize> = result.anomalies.iter().map(|a| a.index).collect();
        assert_eq!(idx, vec![0, 2]);
        assert_eq!(result.anomalies[0].direction(), Direction::Below);
        assert_eq!(result.anomalies[0].z_score, -1.0);
    }

    #[test]
    fn results_keep_series_order() {
        let s = series(&[50.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, -30.0]);
        let result = detect_anomalies(&s, 1.5);
        let idx: Vec<usize> = result.anomalies.iter().map(|a| a.index).collect();
        assert_eq!(idx, vec![0, 9]);
        assert!(result.anomalies[0].z_score > 0.0);
        assert!(result.anomalies[1].z_score < 0.0);
    }

    #[test]
    fn higher_sigma_flags_fewer() {
        let s = series(&[10.0, 12.0, 11.0, 13.0, 95.0, 12.0, 11.0]);
        assert!(detect_anomalies(&s, 3.0).anomalies.is_empty());
    }

    #[test]
    fn detection_is_deterministic() {
        let s = series(&[3.1, 4.7, 1.2, 9.9, 0.4]);
        assert_eq!(detect_anomalies(&s, 1.0), detect_anomalies(&s, 1.0));
    }

    #[test]
    fn json_uses_contract_names() {
        let s = series(&[10.0, 12.0, 11.0, 13.0, 95.0, 12.0, 11.0]);
        let json = serde_json::to_value(detect_anomalies(&s, 2.0)).unwrap();
        assert!(json["stdDev"].is_number());
        assert_eq!(json["anomalies"][0]["index"], 4);
        assert_eq!(json["anomalies"][0]["date"], "2026-10-05");
        assert!(json["anomalies"][0]["zScore"].as_f64().unwrap() >= 2.0);
    }
}
