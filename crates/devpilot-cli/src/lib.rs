#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for crates only used by some test targets
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;

// Used by the binary target only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap, bootstrap_with};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
