//! CLI-specific error types and mappings.
//!
//! This module maps engine, config and path errors to exit codes and
//! user-facing messages.

use devpilot_core::{ConfigError, DispatchError, PathError, WorkspaceError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// The input named no command, recipe or phrase.
    #[error("{0}")]
    Unknown(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A handler could not be loaded.
    #[error("{0}")]
    Unavailable(String),

    /// A handler ran and failed.
    #[error("{0}")]
    Handler(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Handler(_) => 1,
            Self::Arguments(_) => 2,    // EX_USAGE-ish
            Self::Unknown(_) => 64,     // EX_USAGE
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,          // EX_IOERR
            Self::Config(_) => 78,      // EX_CONFIG
        }
    }
}

impl From<DispatchError> for CliError {
    fn from(err: DispatchError) -> Self {
        let message = err.to_string();
        match err {
            DispatchError::UnknownCommand { .. } | DispatchError::UnknownRecipe(_) => {
                Self::Unknown(message)
            }
            DispatchError::Import { .. } => Self::Unavailable(message),
            DispatchError::Handler { .. } => Self::Handler(message),
            DispatchError::MissingArgument { .. } => Self::Arguments(message),
            DispatchError::Workspace(WorkspaceError::InvalidPattern(_)) => Self::Arguments(message),
            DispatchError::Workspace(_) => Self::Io(message),
            DispatchError::RecursionLimit { .. } => Self::Config(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
