//! Handler factory trait definition.
//!
//! The command registry maps names to handler references. A factory turns
//! a reference into a live handler. Adapters decide which reference schemes
//! they support.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Command, LoadError};

/// Reference to a loadable handler, e.g. `exec:git status --short`.
///
/// The part before the first `:` is the scheme, the rest is the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerRef(String);

impl HandlerRef {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scheme of the reference (`exec` for `exec:git status`).
    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once(':').map(|(scheme, _)| scheme.trim())
    }

    /// Everything after the scheme separator.
    pub fn target(&self) -> Option<&str> {
        self.0.split_once(':').map(|(_, target)| target.trim())
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HandlerRef {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Instantiates handlers from registry references.
///
/// Called by the script loader at most once per command name.
#[cfg_attr(test, mockall::automock)]
pub trait HandlerFactory: Send + Sync {
    /// Build the handler for `name` described by `handler_ref`.
    fn instantiate(
        &self,
        name: &str,
        handler_ref: &HandlerRef,
    ) -> Result<Arc<dyn Command>, LoadError>;
}
