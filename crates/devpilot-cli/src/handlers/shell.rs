//! Interactive shell handler.
//!
//! Reads lines with rustyline and runs each one through the dispatcher.
//! Errors are printed and the loop continues.

use anyhow::{Context, Result};
use devpilot_core::Args;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::handlers::run::dispatch;
use crate::presentation::format_outcome;

const PROMPT: &str = "devpilot> ";

/// What the shell should do with a line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Skip,
    Quit,
    Run(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    match line.trim() {
        "" => Line::Skip,
        "exit" | "quit" | ":q" => Line::Quit,
        input => Line::Run(input),
    }
}

/// Execute the shell command.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let mut editor = DefaultEditor::new().context("Failed to initialise line editor")?;
    println!("devpilot shell. Type 'help' for commands, 'exit' to leave.");

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        match classify(&line) {
            Line::Skip => {}
            Line::Quit => break,
            Line::Run(input) => {
                if let Err(e) = editor.add_history_entry(input) {
                    debug!(error = %e, "Could not record shell history");
                }
                debug!(input, "Shell input");
                match dispatch(ctx, input, Args::new()).await {
                    Ok(outcome) => {
                        let text = format_outcome(&outcome);
                        if !text.is_empty() {
                            println!("{text}");
                        }
                    }
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
        }
    }
    Ok(())
}
