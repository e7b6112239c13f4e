//! `tally anomalies` -- flag outliers in a daily series.
//!
//! Input is a JSON array read from a file or stdin (`-`). By default each
//! element is a `{"date": "YYYY-MM-DD", "value": N}` point; with `--daily`
//! each element is a raw `{"timestamp": "...", "value": N}` row and rows
//! are summed per calendar day first. A row counts toward the day written
//! in its timestamp, whatever its offset.

use std::io::Read;

use anyhow::{Context, Result};
use serde::Deserialize;
use tally_anomaly::{MIN_POINTS, TimeSeriesPoint, daily_series, detect_anomalies};
use tally_periods::parse_timestamp_local;
use tally_ui::styles::{format_z_score, render_direction, render_muted};

use crate::cli::AnomaliesArgs;
use crate::context::RuntimeContext;
use crate::output::{format_number, output_json, output_table};

#[derive(Debug, Deserialize)]
struct RawRow {
    timestamp: String,
    value: f64,
}

/// Execute the `tally anomalies` command.
pub fn run(ctx: &RuntimeContext, args: &AnomaliesArgs) -> Result<()> {
    let sigma = ctx
        .config
        .anomaly
        .sigma(args.sigma)
        .context("invalid sigma")?;

    let input = read_input(&args.input)?;
    let series = if args.daily {
        parse_rows(&input)?
    } else {
        serde_json::from_str::<Vec<TimeSeriesPoint>>(&input)
            .context("failed to parse series: expected [{\"date\": ..., \"value\": ...}]")?
    };

    let result = detect_anomalies(&series, sigma.get());

    if ctx.json {
        output_json(&result);
        return Ok(());
    }

    if !ctx.quiet {
        println!(
            "{}",
            render_muted(&format!(
                "{} points  mean {:.2}  stdDev {:.2}  sigma {}",
                series.len(),
                result.mean,
                result.std_dev,
                sigma
            ))
        );
    }

    if !result.has_anomalies() {
        if !ctx.quiet {
            if series.len() < MIN_POINTS {
                println!("{}", render_muted(&format!("fewer than {} points, nothing to judge", MIN_POINTS)));
            } else {
                println!("{}", render_muted("no anomalies"));
            }
        }
        return Ok(());
    }

    let rows: Vec<Vec<String>> = result
        .anomalies
        .iter()
        .map(|a| {
            vec![
                a.index.to_string(),
                a.date.to_string(),
                format_number(a.value),
                format_z_score(a.z_score),
                render_direction(a.direction()),
            ]
        })
        .collect();
    output_table(&["#", "DATE", "VALUE", "Z", ""], &rows);
    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read series from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
    }
}

/// Parse raw rows and sum them per written day.
fn parse_rows(input: &str) -> Result<Vec<TimeSeriesPoint>> {
    let rows: Vec<RawRow> = serde_json::from_str(input)
        .context("failed to parse rows: expected [{\"timestamp\": ..., \"value\": ...}]")?;
    let mut parsed = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        let at = parse_timestamp_local(&row.timestamp).with_context(|| format!("row {}", i))?;
        parsed.push((at, row.value));
    }
    Ok(daily_series(parsed))
}
