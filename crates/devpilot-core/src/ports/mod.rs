//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces that the engine expects from leaf commands
//! and the filesystem. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No process or `tokio::fs` types in any signature
//! - Handlers return a `CommandResult` for completed work, even when the
//!   underlying check failed; `CommandError` is reserved for work that
//!   could not be carried out

pub mod command;
pub mod handler_factory;
pub mod workspace;

use thiserror::Error;

pub use command::Command;
pub use handler_factory::{HandlerFactory, HandlerRef};
pub use workspace::{NoopWorkspace, SearchHit, SearchQuery, Workspace};

#[cfg(test)]
pub use handler_factory::MockHandlerFactory;
#[cfg(test)]
pub use workspace::MockWorkspace;

/// Errors raised by leaf command handlers.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The handler ran but could not complete its work.
    #[error("{0}")]
    Failed(String),

    /// A required argument was not supplied.
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// The external program could not be started.
    #[error("Failed to start {program}: {reason}")]
    Spawn { program: String, reason: String },

    /// IO error while talking to the external program.
    #[error("IO error: {0}")]
    Io(String),
}

/// Errors raised while turning a handler reference into a live handler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    /// No factory understands the reference's scheme.
    #[error("Unsupported handler scheme: {0}")]
    UnsupportedScheme(String),

    /// The reference is malformed.
    #[error("Invalid handler reference: {0}")]
    Invalid(String),
}

/// Errors raised by the workspace port.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The requested file does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// The path resolves outside the workspace root.
    #[error("Path escapes workspace root: {0}")]
    OutsideRoot(String),

    /// The search pattern could not be compiled.
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),

    /// No workspace is configured.
    #[error("No workspace available")]
    Unavailable,

    /// Filesystem error.
    #[error("IO error on {path}: {reason}")]
    Io { path: String, reason: String },
}
