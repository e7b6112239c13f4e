//! Command handlers, one module per subcommand.

pub mod anomalies;
pub mod bucket_index;
pub mod buckets;
pub mod completion;
pub mod eval;
pub mod period_start;
pub mod validate;
pub mod vars;
