#![doc = include_str!("README.md")]

//! Shared CLI presentation utilities.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no dispatching, no IO
//! - Handlers decide what goes to stdout

pub mod outcome;
pub mod tables;

pub use outcome::{format_outcome, format_resolution};
pub use tables::{print_separator, truncate_string};
