//! Invocation types: a command name plus its argument map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Execution context passed to every handler.
///
/// Keys are argument names, values are arbitrary JSON.
pub type Args = Map<String, Value>;

/// A resolved command invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    /// Command name as found in the registry (or a built-in).
    pub command: String,
    /// Arguments derived from the input.
    #[serde(default)]
    pub args: Args,
}

impl Invocation {
    /// Create an invocation without arguments.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Args::new(),
        }
    }

    /// Add a single argument.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

/// Merge `overlay` on top of `base`.
///
/// Keys present in both take the overlay's value.
pub fn merge_args(base: &Args, overlay: &Args) -> Args {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
