//! Core domain types.
//!
//! Pure data with no infrastructure dependencies. Handlers, the engine and
//! adapters all exchange these types.

mod invocation;
mod result;

pub use invocation::{Args, Invocation, merge_args};
pub use result::{CommandResult, Outcome, RecipeResult, StepOutcome};
