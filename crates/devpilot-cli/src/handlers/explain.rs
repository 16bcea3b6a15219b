//! Explain command handler.
//!
//! Shows what `run` would do with an input without running anything.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::presentation::format_resolution;

/// Execute the explain command.
pub fn execute(ctx: &CliContext, input: &[String], json: bool) -> Result<()> {
    let resolution = ctx.dispatcher().resolve(&input.join(" "));
    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        println!("{}", format_resolution(&resolution));
    }
    Ok(())
}
