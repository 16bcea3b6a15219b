//! Config command handler.
//!
//! Diagnostics for config discovery: where the file came from and what it
//! contributed.

use anyhow::Result;
use devpilot_core::Locale;

use crate::bootstrap::CliContext;

/// Execute the config command.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    let path = ctx
        .location
        .path
        .as_ref()
        .map_or_else(|| "-".to_string(), |p| p.display().to_string());

    println!("source            = {}", ctx.location.source);
    println!("path              = {path}");
    println!("working_dir       = {}", ctx.working_dir().display());
    println!("max_depth         = {}", config.settings.max_depth);
    println!(
        "patterns          = {} ({} {}, {} {})",
        config.patterns.len(),
        config.patterns.count(Locale::Secondary),
        Locale::Secondary,
        config.patterns.count(Locale::Primary),
        Locale::Primary
    );
    println!("recipes           = {}", config.recipes.len());
    println!("commands          = {}", config.commands.len());
    Ok(())
}
