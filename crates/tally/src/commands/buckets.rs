//! `tally buckets` -- split a period into chart buckets.

use anyhow::Result;
use chrono::Utc;
use tally_periods::time_buckets_at;
use tally_ui::styles::render_muted;

use crate::cli::PeriodArgs;
use crate::context::RuntimeContext;
use crate::output::{format_instant, output_json, output_table};

/// Execute the `tally buckets` command.
///
/// Bucket width per period comes from the `buckets` config section unless
/// `--granularity` overrides it.
pub fn run(ctx: &RuntimeContext, args: &PeriodArgs) -> Result<()> {
    let now = args.now.unwrap_or_else(Utc::now);
    let policy = match args.granularity {
        Some(g) => ctx.config.buckets.with_granularity(args.period, g),
        None => ctx.config.buckets,
    };
    let buckets = time_buckets_at(args.period, now, &policy);

    if ctx.json {
        output_json(&buckets);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| {
            vec![
                i.to_string(),
                b.label.clone(),
                format_instant(b.start),
                format_instant(b.end),
            ]
        })
        .collect();
    output_table(&["#", "LABEL", "START", "END"], &rows);

    if !ctx.quiet {
        let granularity = policy.granularity(args.period);
        println!(
            "\n{}",
            render_muted(&format!("{} {} buckets for {}", buckets.len(), granularity, args.period))
        );
    }
    Ok(())
}
