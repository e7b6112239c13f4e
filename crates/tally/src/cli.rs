//! Clap CLI definitions for the `tally` command.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tally_periods::{Granularity, Period, parse_timestamp};

/// tally -- analytics computation engine.
///
/// Validate and evaluate custom metric formulas, split reporting periods
/// into chart buckets, and flag anomalies in daily series.
#[derive(Parser, Debug)]
#[command(
    name = "tally",
    about = "Analytics computation engine",
    long_about = "Validate and evaluate custom metric formulas, split reporting periods into chart buckets, and flag anomalies in daily series.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Configuration file (default: ./tally.yaml if present).
    #[arg(long, global = true, env = "TALLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // ===== Formulas =====
    /// Check a formula's syntax without evaluating it.
    #[command(alias = "check")]
    Validate(ValidateArgs),

    /// List the variables a formula references.
    Vars(VarsArgs),

    /// Evaluate a formula against a variable context.
    Eval(EvalArgs),

    // ===== Periods =====
    /// Print the start instant of a reporting period.
    PeriodStart(PeriodArgs),

    /// Split a reporting period into chart buckets.
    Buckets(PeriodArgs),

    /// Find the bucket a timestamp falls in (-1 for none).
    BucketIndex(BucketIndexArgs),

    // ===== Anomalies =====
    /// Flag outliers in a daily series.
    Anomalies(AnomaliesArgs),

    // ===== Utilities =====
    /// Generate shell completions.
    Completion(CompletionArgs),
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// Arguments for `tally validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Formula text, e.g. "(revenue - cost) / cost * 100".
    #[arg(allow_hyphen_values = true)]
    pub formula: String,
}

/// Arguments for `tally vars`.
#[derive(Args, Debug)]
pub struct VarsArgs {
    /// Formula text.
    #[arg(allow_hyphen_values = true)]
    pub formula: String,

    /// Fail if any variable is outside the business catalogue.
    #[arg(long)]
    pub check: bool,
}

/// Arguments for `tally eval`.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Formula text.
    #[arg(allow_hyphen_values = true)]
    pub formula: String,

    /// Variable value (name=number). Overrides the context file.
    #[arg(long = "var", value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// Context file mapping variable names to numbers (.json or .toml).
    #[arg(long)]
    pub context: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// Arguments shared by `tally period-start` and `tally buckets`.
#[derive(Args, Debug)]
pub struct PeriodArgs {
    /// Period token: 7d, 30d, 90d, or ytd.
    pub period: Period,

    /// Reference time instead of the current time.
    #[arg(long, value_parser = parse_timestamp)]
    pub now: Option<DateTime<Utc>>,

    /// Bucket width (day, week, month) instead of the configured one.
    #[arg(long)]
    pub granularity: Option<Granularity>,
}

/// Arguments for `tally bucket-index`.
#[derive(Args, Debug)]
pub struct BucketIndexArgs {
    /// Period token: 7d, 30d, 90d, or ytd.
    pub period: Period,

    /// Timestamp to locate (RFC 3339 or YYYY-MM-DD).
    pub timestamp: String,

    /// Reference time instead of the current time.
    #[arg(long, value_parser = parse_timestamp)]
    pub now: Option<DateTime<Utc>>,

    /// Bucket width (day, week, month) instead of the configured one.
    #[arg(long)]
    pub granularity: Option<Granularity>,
}

// ---------------------------------------------------------------------------
// Anomalies
// ---------------------------------------------------------------------------

/// Arguments for `tally anomalies`.
#[derive(Args, Debug)]
pub struct AnomaliesArgs {
    /// JSON file with the series, or "-" for stdin.
    pub input: String,

    /// Z-score threshold (default from config).
    #[arg(long)]
    pub sigma: Option<f64>,

    /// Input is raw {timestamp, value} rows to sum per calendar day.
    #[arg(long)]
    pub daily: bool,
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Arguments for `tally completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    #[command(subcommand)]
    pub command: CompletionCommands,
}

/// Completion subcommands.
#[derive(Subcommand, Debug)]
pub enum CompletionCommands {
    /// Generate Bash completions.
    Bash,
    /// Generate Zsh completions.
    Zsh,
    /// Generate Fish completions.
    Fish,
    /// Generate PowerShell completions.
    Powershell,
}
