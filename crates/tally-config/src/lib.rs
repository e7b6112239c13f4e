//! Configuration management for the tally engine.
//!
//! Settings are layered with figment: built-in defaults, then an optional
//! `tally.yaml`, then `TALLY_`-prefixed environment variables (`__`
//! separates nested keys, e.g. `TALLY_FORMULA__MAX_DEPTH=32`).

pub mod config;

pub use config::{AnomalyConfig, ConfigError, EngineConfig, load_config, save_config};
