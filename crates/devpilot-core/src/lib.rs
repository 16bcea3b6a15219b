#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod engine;
pub mod paths;
pub mod ports;

// Re-export commonly used types for convenience
pub use config::{ConfigError, EngineConfig, EngineSettings, PatternRuleConfig, RawConfig};
pub use domain::{Args, CommandResult, Invocation, Outcome, RecipeResult, StepOutcome, merge_args};
pub use engine::{
    BUILTIN_COMMANDS, DispatchError, Dispatcher, Explanation, Extractor, Locale, PatternAction,
    PatternRule, PatternSet, RecipeEngine, Resolution, ResolvedAction, ScriptLoader, USAGE_HINT,
    render_help,
};
pub use paths::{ConfigLocation, ConfigSource, PathError, resolve_config_path};
pub use ports::{
    Command, CommandError, HandlerFactory, HandlerRef, LoadError, NoopWorkspace, SearchHit,
    SearchQuery, Workspace, WorkspaceError,
};

// Silence unused dev-dependency warnings for crates only used by some test targets
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
