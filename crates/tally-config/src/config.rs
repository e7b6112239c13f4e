//! Configuration types and loading.
//!
//! The main entry point is [`EngineConfig`]. Configuration is loaded with
//! [`load_config`] and saved with [`save_config`].

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use tally_anomaly::{Sigma, SigmaError};
use tally_formula::Limits;
use tally_formula::parser::HARD_DEPTH_LIMIT;
use tally_periods::BucketPolicy;
use thiserror::Error;
use tracing::info;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tally.yaml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "TALLY_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// An explicitly requested configuration file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The layered configuration could not be extracted.
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    /// The configuration could not be serialized to YAML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Anomaly detection section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// Sigma used when a caller does not ask for one.
    #[serde(default = "default_sigma")]
    pub default_sigma: f64,

    /// Smallest sigma a caller may request.
    #[serde(default = "default_min_sigma")]
    pub min_sigma: f64,

    /// Largest sigma a caller may request.
    #[serde(default = "default_max_sigma")]
    pub max_sigma: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            default_sigma: default_sigma(),
            min_sigma: default_min_sigma(),
            max_sigma: default_max_sigma(),
        }
    }
}

fn default_sigma() -> f64 {
    Sigma::DEFAULT.get()
}

fn default_min_sigma() -> f64 {
    Sigma::MIN
}

fn default_max_sigma() -> f64 {
    Sigma::MAX
}

impl AnomalyConfig {
    /// Resolve a requested sigma (or the default) against the allowed range.
    pub fn sigma(&self, requested: Option<f64>) -> std::result::Result<Sigma, SigmaError> {
        Sigma::bounded(
            requested.unwrap_or(self.default_sigma),
            self.min_sigma,
            self.max_sigma,
        )
    }
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full engine configuration, corresponding to `tally.yaml`.
///
/// All sections use `serde` defaults so a partially-specified file is
/// filled in with the built-in values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Formula length and nesting limits.
    #[serde(default)]
    pub formula: Limits,

    /// Anomaly detection thresholds.
    #[serde(default)]
    pub anomaly: AnomalyConfig,

    /// Bucket width per period.
    #[serde(default)]
    pub buckets: BucketPolicy,
}

impl EngineConfig {
    /// Check cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.formula.max_length == 0 {
            return Err(invalid("formula.max_length", "must be at least 1"));
        }
        for (key, depth) in [
            ("formula.max_depth", self.formula.max_depth),
            ("formula.max_tree_depth", self.formula.max_tree_depth),
        ] {
            if depth == 0 || depth > HARD_DEPTH_LIMIT {
                return Err(invalid(
                    key,
                    &format!("must be between 1 and {}", HARD_DEPTH_LIMIT),
                ));
            }
        }

        let a = &self.anomaly;
        if !(a.min_sigma.is_finite() && a.min_sigma > 0.0) {
            return Err(invalid("anomaly.min_sigma", "must be a positive number"));
        }
        if !a.max_sigma.is_finite() || a.max_sigma < a.min_sigma {
            return Err(invalid(
                "anomaly.max_sigma",
                &format!("must be a number no smaller than min_sigma ({})", a.min_sigma),
            ));
        }
        if let Err(e) = a.sigma(None) {
            return Err(invalid("anomaly.default_sigma", &e.to_string()));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Load / Save
// ---------------------------------------------------------------------------

/// Build the layered figment: defaults, then the YAML file, then the
/// environment.
///
/// With `path = None`, `tally.yaml` in the working directory is used if it
/// exists. An explicit path that does not exist is an error.
pub fn figment(path: Option<&Path>) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(EngineConfig::default()));

    match path {
        Some(p) if !p.exists() => return Err(ConfigError::NotFound(p.to_path_buf())),
        Some(p) => {
            info!(path = %p.display(), "loading configuration");
            figment = figment.merge(Yaml::file(p));
        }
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                info!(path = DEFAULT_CONFIG_FILE, "loading configuration");
                figment = figment.merge(Yaml::file(default));
            }
        }
    }

    Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

/// Extract and validate an [`EngineConfig`] from a figment.
pub fn extract(figment: &Figment) -> Result<EngineConfig> {
    let config: EngineConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration (see [`figment`] for the layering rules).
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] for a missing explicit path,
/// [`ConfigError::Load`] for malformed YAML or mistyped values, and
/// [`ConfigError::InvalidValue`] when validation fails.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    extract(&figment(path)?)
}

/// Save configuration as YAML, creating parent directories as needed.
pub fn save_config(path: &Path, config: &EngineConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tally_periods::{Granularity, Period};

    fn from_yaml(yaml: &str) -> Result<EngineConfig> {
        let figment = Figment::from(Serialized::defaults(EngineConfig::default()))
            .merge(Yaml::string(yaml));
        extract(&figment)
    }

    #[test]
    fn test_default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.formula.max_length, 1000);
        assert_eq!(cfg.formula.max_depth, 64);
        assert_eq!(cfg.formula.max_tree_depth, 512);
        assert_eq!(cfg.anomaly.default_sigma, 2.0);
        assert_eq!(cfg.buckets.granularity(Period::Last90Days), Granularity::Week);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let cfg = from_yaml("formula:\n  max_depth: 16\nbuckets:\n  ytd: week\n").unwrap();
        assert_eq!(cfg.formula.max_depth, 16);
        assert_eq!(cfg.formula.max_length, 1000);
        assert_eq!(cfg.buckets.year_to_date, Granularity::Week);
        assert_eq!(cfg.buckets.last_7_days, Granularity::Day);
        assert_eq!(cfg.anomaly, AnomalyConfig::default());
    }

    #[test]
    fn test_rejects_inverted_sigma_range() {
        let err = from_yaml("anomaly:\n  min_sigma: 4\n  max_sigma: 3\n").unwrap_err();
        assert!(err.to_string().contains("anomaly.max_sigma"), "{err}");
    }

    #[test]
    fn test_rejects_default_sigma_outside_range() {
        let err = from_yaml("anomaly:\n  default_sigma: 9\n").unwrap_err();
        assert!(err.to_string().contains("anomaly.default_sigma"), "{err}");
    }

    #[test]
    fn test_rejects_zero_depth() {
        let err = from_yaml("formula:\n  max_depth: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "formula.max_depth"));
    }

    #[test]
    fn test_rejects_depth_above_ceiling() {
        let err = from_yaml("formula:\n  max_tree_depth: 100000\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "formula.max_tree_depth"));
        let err = from_yaml("formula:\n  max_depth: 1025\n").unwrap_err();
        assert!(err.to_string().contains("between 1 and 1024"), "{err}");

        let cfg = from_yaml("formula:\n  max_length: 100000\n  max_tree_depth: 1024\n").unwrap();
        assert_eq!(cfg.formula.max_tree_depth, HARD_DEPTH_LIMIT);
    }

    #[test]
    fn test_rejects_unknown_granularity() {
        assert!(matches!(
            from_yaml("buckets:\n  30d: hour\n"),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_sigma_resolution() {
        let cfg = AnomalyConfig::default();
        assert_eq!(cfg.sigma(None).unwrap().get(), 2.0);
        assert_eq!(cfg.sigma(Some(3.5)).unwrap().get(), 3.5);
        assert!(cfg.sigma(Some(0.5)).is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_roundtrip_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("tally.yaml");

        let mut cfg = EngineConfig::default();
        cfg.formula.max_length = 256;
        cfg.anomaly.default_sigma = 3.0;
        cfg.buckets.last_30_days = Granularity::Week;

        save_config(&path, &cfg).unwrap();
        let figment = Figment::from(Serialized::defaults(EngineConfig::default()))
            .merge(Yaml::file(&path));
        let loaded = extract(&figment).unwrap();

        assert_eq!(loaded, cfg);
    }
}
