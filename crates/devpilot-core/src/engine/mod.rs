//! Resolution and execution engine.
//!
//! - [`PatternSet`] maps phrases to recipes or commands
//! - [`Dispatcher`] resolves input and routes it
//! - [`RecipeEngine`] runs recipe steps through the dispatcher
//! - [`ScriptLoader`] instantiates and caches handlers

mod dispatcher;
mod error;
mod help;
mod loader;
mod patterns;
mod recipe;

pub use dispatcher::{
    BUILTIN_COMMANDS, Dispatcher, READ_COMMAND, Resolution, SEARCH_COMMAND, WRITE_COMMAND,
};
pub use error::{DispatchError, USAGE_HINT};
pub use help::render_help;
pub use loader::ScriptLoader;
pub use patterns::{
    Explanation, Extractor, Locale, PatternAction, PatternRule, PatternSet, ResolvedAction,
};
pub use recipe::{RecipeEngine, SMART_STOP_STEP};
