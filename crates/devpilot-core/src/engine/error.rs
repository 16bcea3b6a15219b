//! Dispatch error taxonomy.

use thiserror::Error;

use crate::ports::{CommandError, WorkspaceError};

/// Usage hint attached to unknown-command errors.
pub const USAGE_HINT: &str = "Run 'help' to list available commands and recipes";

/// Errors surfaced by [`Dispatcher::execute`](super::Dispatcher::execute).
///
/// Direct execution propagates every variant to the caller. Inside a
/// recipe, any error is recorded as a failed step instead.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The input resolved to a name that is neither registered nor built in.
    #[error("Unknown command: {name}. {hint}")]
    UnknownCommand { name: String, hint: String },

    /// A recipe was referenced that has no dictionary entry.
    #[error("Unknown recipe: {0}")]
    UnknownRecipe(String),

    /// The handler could not be resolved or instantiated.
    #[error("Failed to load handler for '{name}': {reason}")]
    Import { name: String, reason: String },

    /// The handler ran and returned an error.
    #[error("Command '{command}' failed: {source}")]
    Handler {
        command: String,
        source: CommandError,
    },

    /// A built-in command was called without a required argument.
    #[error("Command '{command}' requires argument '{key}'")]
    MissingArgument { command: String, key: String },

    /// File access for a built-in command failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Recipes nested deeper than the configured limit.
    #[error("Recipe nesting exceeded {limit} levels while resolving '{input}'")]
    RecursionLimit { input: String, limit: usize },
}

impl DispatchError {
    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::UnknownCommand {
            name: name.into(),
            hint: USAGE_HINT.to_string(),
        }
    }
}
