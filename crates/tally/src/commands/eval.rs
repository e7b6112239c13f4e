//! `tally eval` -- evaluate a formula against a variable context.
//!
//! The context is built from an optional `--context` file (JSON or TOML,
//! detected by extension) and then `--var name=value` flags, which win.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tally_formula::{NumericDeviation, VariableContext, parse_with_limits};
use tally_ui::styles::{render_muted, render_warn_icon};
use tracing::debug;

use crate::cli::EvalArgs;
use crate::context::RuntimeContext;
use crate::output::{format_number, output_json};

#[derive(Serialize)]
struct EvalView<'a> {
    formula: String,
    value: f64,
    deviations: &'a [NumericDeviation],
    /// Referenced variables absent from the context, read as 0.
    missing: Vec<&'a str>,
}

/// Execute the `tally eval` command.
pub fn run(ctx: &RuntimeContext, args: &EvalArgs) -> Result<()> {
    let mut vars = match &args.context {
        Some(path) => load_context(path)?,
        None => VariableContext::new(),
    };
    let overrides = parse_var_flags(&args.vars)?;
    vars.extend(overrides.iter());
    debug!(variables = vars.len(), "variable context built");

    let expr = parse_with_limits(&args.formula, &ctx.config.formula)
        .with_context(|| format!("invalid formula '{}'", args.formula))?;
    let evaluation = expr.evaluate_detailed(&vars);
    let missing: Vec<&str> = expr
        .variables()
        .into_iter()
        .filter(|name| !vars.contains(name))
        .collect();

    if ctx.json {
        output_json(&EvalView {
            formula: expr.to_string(),
            value: evaluation.value,
            deviations: &evaluation.deviations,
            missing,
        });
        return Ok(());
    }

    if ctx.verbose {
        eprintln!("{}", render_muted(&format!("= {}", expr)));
    }
    println!("{}", format_number(evaluation.value));
    if ctx.quiet {
        return Ok(());
    }

    if !missing.is_empty() {
        if vars.is_empty() {
            eprintln!("{} no variables set, all read as 0", render_warn_icon());
        } else {
            for name in &missing {
                eprintln!("{} {} not set, read as 0", render_warn_icon(), name);
            }
        }
    }
    if !evaluation.is_clean() {
        for deviation in &evaluation.deviations {
            eprintln!("{} {} evaluated as 0", render_warn_icon(), deviation);
        }
    }
    Ok(())
}

/// Parse `--var name=value` flags into a context.
pub(crate) fn parse_var_flags(vars: &[String]) -> Result<VariableContext> {
    let mut ctx = VariableContext::new();
    for v in vars {
        let Some((name, value)) = v.split_once('=') else {
            bail!("invalid variable format '{}': expected name=value", v);
        };
        let name = name.trim();
        check_name(name)?;
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("invalid value for variable '{}': '{}'", name, value))?;
        check_value(name, value)?;
        ctx.insert(name, value);
    }
    Ok(ctx)
}

/// Load a context file, auto-detecting JSON or TOML by extension.
pub(crate) fn load_context(path: &Path) -> Result<VariableContext> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read context file {}", path.display()))?;

    let map: HashMap<String, f64> = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON context {}", path.display()))?,
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("failed to parse TOML context {}", path.display()))?,
        _ => bail!(
            "unsupported context file '{}': expected .json or .toml",
            path.display()
        ),
    };

    for (name, value) in &map {
        check_name(name)?;
        check_value(name, *value)?;
    }
    Ok(VariableContext::from(map))
}

fn check_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        bail!("invalid variable name '{}'", name);
    }
    Ok(())
}

fn check_value(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        bail!("variable '{}' must be a finite number", name);
    }
    Ok(())
}
