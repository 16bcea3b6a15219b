//! Main commands enum.
//!
//! This module defines the available subcommands for the CLI tool.

use clap::Subcommand;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run a command, a recipe or a phrase
    Run {
        /// What to run, e.g. `git:status`, `commit-push` or `fix de ci`
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
        /// Argument passed to the command (repeatable)
        #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how an input would be resolved without running it
    Explain {
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recipes and their steps
    Recipes,

    /// List registered commands and their handlers
    Commands,

    /// Show where configuration was loaded from
    Config,

    /// Interactive prompt that runs each line
    Shell,
}
