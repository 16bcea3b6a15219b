#![doc = include_str!("README.md")]

//! Command handlers that drive the dispatcher.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `execute(ctx: &CliContext, ...) -> Result<..>`
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Call the `Dispatcher` or read its config
//!   3. Format output for the terminal
//!
//! Handlers should NOT:
//! - Construct adapters (that is `bootstrap`'s job)
//! - Contain resolution or recipe logic

pub mod config;
pub mod explain;
pub mod list;
pub mod run;
pub mod shell;
