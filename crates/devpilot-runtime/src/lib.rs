#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod exec;
pub mod workspace;

pub use exec::{CHECK_SCHEME, EXEC_SCHEME, ExecCommand, ExecHandlerFactory};
pub use workspace::{DEFAULT_SEARCH_LIMIT, FsWorkspace};

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
