//! Command handler trait definition.
//!
//! Every leaf command (git wrapper, test runner, linter) implements this
//! trait. The engine never looks inside a handler; it only calls `run`.

use async_trait::async_trait;

use super::CommandError;
use crate::domain::{Args, CommandResult};

/// A runnable leaf command.
///
/// # Contract
///
/// - `run` may suspend for as long as the underlying tool needs; the engine
///   applies no timeout
/// - A check (a test runner) that ran and found problems returns `Ok`
///   with `failed: Some(true)`, which lets a recipe stop quietly
/// - Any other failure, including a tool that exits unsuccessfully, is
///   an `Err` and stops a recipe as a failed step
#[async_trait]
pub trait Command: Send + Sync {
    /// Run the command with the merged argument map.
    async fn run(&self, args: Args) -> Result<CommandResult, CommandError>;
}
