//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds what a command handler needs: the global
//! output flags and the loaded engine configuration.

use anyhow::{Context, Result};
use tally_config::{EngineConfig, load_config};
use tracing::debug;

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Layered engine configuration (defaults, file, environment).
    pub config: EngineConfig,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments, loading the
    /// configuration from `--config`, `TALLY_CONFIG`, or `./tally.yaml`.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let config = load_config(global.config.as_deref()).context("failed to load configuration")?;
        debug!(?config, "configuration resolved");

        Ok(Self {
            config,
            json: global.json,
            verbose: global.verbose,
            quiet: global.quiet,
        })
    }
}
