//! Recipe and command listing handlers.

use anyhow::Result;
use devpilot_core::BUILTIN_COMMANDS;

use crate::bootstrap::CliContext;
use crate::presentation::{print_separator, truncate_string};

/// Execute the recipes command.
pub fn recipes(ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    if config.recipes.is_empty() {
        println!("No recipes configured.");
        return Ok(());
    }

    println!("Found {} recipe(s):\n", config.recipes.len());
    for (name, steps) in &config.recipes {
        println!("{name:<16} {}", steps.join(" -> "));
    }
    Ok(())
}

/// Execute the commands command.
pub fn commands(ctx: &CliContext) -> Result<()> {
    let config = ctx.config();

    println!("{:<22} Handler", "Command");
    print_separator(70);
    for (name, handler) in &config.commands {
        let handler = handler
            .as_ref()
            .map_or_else(|| "(built-in)".to_string(), ToString::to_string);
        println!(
            "{:<22} {}",
            truncate_string(name, 21),
            truncate_string(&handler, 47)
        );
    }
    for name in BUILTIN_COMMANDS {
        if !config.commands.contains_key(*name) {
            println!("{name:<22} (built-in)");
        }
    }
    Ok(())
}
