//! Path-related error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the user's home directory.
    #[error("Cannot determine home directory")]
    NoHomeDir,

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,

    /// An explicitly requested config file does not exist.
    #[error("Config file {0} does not exist")]
    NotFound(PathBuf),

    /// Failed to get the current working directory.
    #[error("Cannot determine current directory: {0}")]
    CurrentDirError(String),
}
