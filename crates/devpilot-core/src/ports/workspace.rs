//! Workspace trait definition.
//!
//! Backs the `search`, `read` and `write` built-in commands, which the
//! dispatcher handles without going through the command registry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::WorkspaceError;

/// A text search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Text to look for (matched literally, case-insensitive).
    pub pattern: String,
    /// Sub-path of the workspace to restrict the search to.
    pub path: Option<String>,
    /// Maximum number of hits; adapters apply their own default when `None`.
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            path: None,
            limit: None,
        }
    }
}

/// A single search match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Path relative to the workspace root.
    pub path: String,
    /// 1-based line number.
    pub line: usize,
    /// The matching line, trimmed.
    pub text: String,
}

/// File access for the built-in commands.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Search files for a literal pattern.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, WorkspaceError>;

    /// Read a file as UTF-8 text.
    async fn read(&self, path: &str) -> Result<String, WorkspaceError>;

    /// Write a file, creating parent directories. Returns bytes written.
    async fn write(&self, path: &str, content: &str) -> Result<u64, WorkspaceError>;
}

/// Workspace for contexts without file access.
///
/// Every operation fails with `WorkspaceError::Unavailable`.
#[derive(Debug, Clone, Default)]
pub struct NoopWorkspace;

impl NoopWorkspace {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Workspace for NoopWorkspace {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<SearchHit>, WorkspaceError> {
        Err(WorkspaceError::Unavailable)
    }

    async fn read(&self, _path: &str) -> Result<String, WorkspaceError> {
        Err(WorkspaceError::Unavailable)
    }

    async fn write(&self, _path: &str, _content: &str) -> Result<u64, WorkspaceError> {
        Err(WorkspaceError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_workspace_is_unavailable() {
        let ws = NoopWorkspace::new();
        let err = ws.read("README.md").await.unwrap_err();
        assert!(matches!(err, WorkspaceError::Unavailable));
    }
}
