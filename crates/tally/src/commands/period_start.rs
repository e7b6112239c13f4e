//! `tally period-start` -- print the start instant of a period.

use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use tally_periods::period_start_at;

use crate::cli::PeriodArgs;
use crate::context::RuntimeContext;
use crate::output::{format_instant, output_json};

/// Execute the `tally period-start` command.
pub fn run(ctx: &RuntimeContext, args: &PeriodArgs) -> Result<()> {
    let now = args.now.unwrap_or_else(Utc::now);
    let start = period_start_at(args.period, now);

    if ctx.json {
        output_json(&json!({
            "period": args.period,
            "start": format_instant(start),
            "now": format_instant(now),
        }));
    } else {
        println!("{}", format_instant(start));
    }
    Ok(())
}
