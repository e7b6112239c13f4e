//! `tally validate` -- check formula syntax.

use anyhow::{Result, bail};
use tally_formula::{Validation, parse_with_limits};
use tally_ui::styles::{render_fail_icon, render_muted, render_pass_icon};

use crate::cli::ValidateArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `tally validate` command.
///
/// Fails for an invalid formula. Under `--json` the validation object is
/// printed to stdout either way.
pub fn run(ctx: &RuntimeContext, args: &ValidateArgs) -> Result<()> {
    let parsed = parse_with_limits(&args.formula, &ctx.config.formula);

    if ctx.json {
        let error = parsed.as_ref().err().cloned();
        output_json(&Validation::from(parsed));
        return match error {
            Some(e) => bail!("invalid formula: {}", e),
            None => Ok(()),
        };
    }

    match parsed {
        Ok(expr) => {
            if !ctx.quiet {
                println!("{} valid  {}", render_pass_icon(), render_muted(&expr.to_string()));
            }
            Ok(())
        }
        Err(e) => {
            if !ctx.quiet {
                eprintln!("{} {}", render_fail_icon(), args.formula);
                eprintln!("  {}^", " ".repeat(e.position()));
            }
            bail!("invalid formula: {}", e)
        }
    }
}
