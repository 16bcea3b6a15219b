//! Path utilities for locating the devpilot configuration file.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - Resolution is a pure function of its inputs; the public entry point
//!   only gathers environment state and delegates

mod config;
mod error;

pub use config::{
    CONFIG_ENV_VAR, ConfigLocation, ConfigSource, LOCAL_CONFIG_FILE, resolve_config_path,
    resolve_config_path_from, user_config_path,
};
pub use error::PathError;
