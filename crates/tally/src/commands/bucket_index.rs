//! `tally bucket-index` -- locate a timestamp among a period's buckets.

use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use tally_periods::{find_bucket_index_str, time_buckets_at};

use crate::cli::BucketIndexArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `tally bucket-index` command.
///
/// Prints the zero-based index, or `-1` when the timestamp is outside the
/// period or cannot be parsed.
pub fn run(ctx: &RuntimeContext, args: &BucketIndexArgs) -> Result<()> {
    let now = args.now.unwrap_or_else(Utc::now);
    let policy = match args.granularity {
        Some(g) => ctx.config.buckets.with_granularity(args.period, g),
        None => ctx.config.buckets,
    };
    let buckets = time_buckets_at(args.period, now, &policy);
    let index = find_bucket_index_str(&buckets, &args.timestamp).map_or(-1, |i| i as i64);

    if ctx.json {
        let label = usize::try_from(index).ok().map(|i| buckets[i].label.clone());
        output_json(&json!({
            "timestamp": args.timestamp,
            "index": index,
            "label": label,
        }));
    } else {
        println!("{}", index);
    }
    Ok(())
}
