//! Result types returned by handlers, recipes and the dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Loosely structured outcome of a single command.
///
/// Handlers fill in whatever fields make sense for them. The engine only
/// looks at `failed`, which drives the recipe smart-stop rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Set by handlers that completed but report a failed check (tests, lint).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResult {
    /// A successful result with no payload.
    pub fn ok() -> Self {
        Self {
            success: Some(true),
            ..Self::default()
        }
    }

    /// A completed-but-failed result.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            failed: Some(true),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Whether the handler flagged this result as failed.
    pub fn is_failed(&self) -> bool {
        self.failed.unwrap_or(false)
    }
}

/// One recorded step of a recipe run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// The step string exactly as written in the recipe.
    pub step: String,
    /// `false` only when the step returned an error.
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepOutcome {
    pub fn succeeded(step: impl Into<String>, result: Outcome) -> Self {
        Self {
            step: step.into(),
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn errored(step: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Aggregated result of a recipe run.
///
/// `success` covers the recorded steps only. A recipe halted by the
/// smart-stop rule after only successful steps still reports `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeResult {
    pub recipe: String,
    pub steps: Vec<StepOutcome>,
    pub success: bool,
}

impl RecipeResult {
    /// Build a result, deriving `success` from the recorded steps.
    pub fn from_steps(recipe: impl Into<String>, steps: Vec<StepOutcome>) -> Self {
        let success = steps.iter().all(|s| s.success);
        Self {
            recipe: recipe.into(),
            steps,
            success,
        }
    }
}

/// Anything `Dispatcher::execute` can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Recipe(RecipeResult),
    Command(CommandResult),
}

impl Outcome {
    /// The `failed` flag of a command result. Recipe outcomes never carry it.
    pub fn is_failed(&self) -> bool {
        match self {
            Self::Command(result) => result.is_failed(),
            Self::Recipe(_) => false,
        }
    }

    /// Overall success as seen by a caller (exit codes, summaries).
    pub fn succeeded(&self) -> bool {
        match self {
            Self::Command(result) => !result.is_failed() && result.success != Some(false),
            Self::Recipe(recipe) => recipe.success,
        }
    }

    pub const fn as_command(&self) -> Option<&CommandResult> {
        match self {
            Self::Command(result) => Some(result),
            Self::Recipe(_) => None,
        }
    }

    pub const fn as_recipe(&self) -> Option<&RecipeResult> {
        match self {
            Self::Recipe(result) => Some(result),
            Self::Command(_) => None,
        }
    }
}

impl From<CommandResult> for Outcome {
    fn from(result: CommandResult) -> Self {
        Self::Command(result)
    }
}

impl From<RecipeResult> for Outcome {
    fn from(result: RecipeResult) -> Self {
        Self::Recipe(result)
    }
}
