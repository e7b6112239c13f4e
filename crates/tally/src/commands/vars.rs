//! `tally vars` -- list the variables a formula references.

use anyhow::{Result, bail};
use serde::Serialize;
use tally_formula::catalog::{lookup, unknown_variables};
use tally_formula::extract_variables;
use tally_ui::styles::{render_muted, render_warn, render_warn_icon};

use crate::cli::VarsArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

#[derive(Serialize)]
struct VarsView {
    variables: Vec<String>,
    unknown: Vec<String>,
}

/// Execute the `tally vars` command.
///
/// Extraction is lenient: a formula that does not parse still lists the
/// identifiers it contains. With `--check`, variables outside the business
/// catalogue make the command fail.
pub fn run(ctx: &RuntimeContext, args: &VarsArgs) -> Result<()> {
    let variables: Vec<String> = extract_variables(&args.formula).into_iter().collect();
    let unknown = unknown_variables(&args.formula);

    if ctx.json {
        output_json(&VarsView {
            variables,
            unknown: unknown.clone(),
        });
    } else if !ctx.quiet {
        for name in &variables {
            match lookup(name) {
                Some(info) => println!("{}  {}", name, render_muted(info.description)),
                None if args.check => println!(
                    "{}  {} {}",
                    name,
                    render_warn_icon(),
                    render_warn("unknown, always evaluates to 0")
                ),
                None => println!("{}", name),
            }
        }
    }

    if args.check && !unknown.is_empty() {
        bail!("unknown variables: {}", unknown.join(", "));
    }
    Ok(())
}
