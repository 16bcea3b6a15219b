//! Sequential recipe execution.
//!
//! A recipe is a flat list of step strings. Each step goes back through
//! the dispatcher, so a step may be a command, a phrase or another recipe.
//! Steps run strictly one after another.
//!
//! Stop rules:
//! - a step that returns an error is recorded as failed and ends the run
//! - a step named exactly `test` whose result has `failed: true` is
//!   recorded as succeeded and ends the run
//!
//! `success` is computed over the recorded steps only.

use tracing::{info, warn};

use super::{DispatchError, Dispatcher};
use crate::domain::{Args, RecipeResult, StepOutcome};

/// Step name that triggers the smart-stop rule.
pub const SMART_STOP_STEP: &str = "test";

/// Recipe runner bound to a dispatcher.
#[derive(Clone, Copy)]
pub struct RecipeEngine<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> RecipeEngine<'a> {
    pub const fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Run the recipe `name` with `context` passed to every step.
    pub async fn run_recipe(
        &self,
        name: &str,
        context: Args,
    ) -> Result<RecipeResult, DispatchError> {
        self.run_at(name, context, 0).await
    }

    pub(crate) async fn run_at(
        &self,
        name: &str,
        context: Args,
        depth: usize,
    ) -> Result<RecipeResult, DispatchError> {
        let steps = self
            .dispatcher
            .config()
            .recipe(name)
            .ok_or_else(|| DispatchError::UnknownRecipe(name.to_string()))?;

        info!(recipe = name, steps = steps.len(), depth, "Running recipe");

        let mut recorded = Vec::with_capacity(steps.len());
        for step in steps {
            match self
                .dispatcher
                .execute_at(step, context.clone(), depth + 1)
                .await
            {
                Ok(outcome) => {
                    let stop = step == SMART_STOP_STEP && outcome.is_failed();
                    recorded.push(StepOutcome::succeeded(step.as_str(), outcome));
                    if stop {
                        warn!(recipe = name, step = %step, "Tests failed, stopping recipe");
                        break;
                    }
                }
                Err(err) => {
                    warn!(recipe = name, step = %step, error = %err, "Recipe step failed");
                    recorded.push(StepOutcome::errored(step.as_str(), err.to_string()));
                    break;
                }
            }
        }

        let result = RecipeResult::from_steps(name, recorded);
        info!(
            recipe = name,
            success = result.success,
            recorded = result.steps.len(),
            total = steps.len(),
            "Recipe finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, RawConfig};
    use crate::domain::{CommandResult, Outcome};
    use crate::engine::{Locale, PatternAction, PatternRule, PatternSet};
    use crate::ports::{Command, CommandError, HandlerFactory, HandlerRef, LoadError, NoopWorkspace};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    /// `test:<behaviour>` refs: `ok`, `throw` or `failed`.
    struct Scripted {
        name: String,
        behaviour: String,
        log: Log,
    }

    #[async_trait]
    impl Command for Scripted {
        async fn run(&self, _args: Args) -> Result<CommandResult, CommandError> {
            self.log.lock().unwrap().push(self.name.clone());
            match self.behaviour.as_str() {
                "throw" => Err(CommandError::Failed(format!("{} blew up", self.name))),
                "failed" => Ok(CommandResult::failure("1 test failed")),
                _ => Ok(CommandResult::ok()),
            }
        }
    }

    struct ScriptedFactory(Log);

    impl HandlerFactory for ScriptedFactory {
        fn instantiate(&self, name: &str, r: &HandlerRef) -> Result<Arc<dyn Command>, LoadError> {
            Ok(Arc::new(Scripted {
                name: name.to_string(),
                behaviour: r.target().unwrap_or("ok").to_string(),
                log: Arc::clone(&self.0),
            }))
        }
    }

    fn dispatcher(
        recipes: serde_json::Value,
        commands: serde_json::Value,
        patterns: PatternSet,
    ) -> (Dispatcher, Log) {
        let raw: RawConfig = serde_json::from_value(json!({
            "settings": { "max_depth": 4 },
            "recipes": recipes,
            "commands": commands,
        }))
        .unwrap();
        let mut config = EngineConfig::from_raw(raw).unwrap();
        config.patterns = patterns;

        let log = Log::default();
        let factory = ScriptedFactory(Arc::clone(&log));
        (
            Dispatcher::new(config, Arc::new(factory), Arc::new(NoopWorkspace::new())),
            log,
        )
    }

    fn ran(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let (d, log) = dispatcher(
            json!({ "status": ["git:status", "ci:status", "pr:status"] }),
            json!({ "git:status": "test:ok", "ci:status": "test:ok", "pr:status": "test:ok" }),
            PatternSet::default(),
        );
        let result = d.run_recipe("status", Args::new()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.steps.len(), 3);
        assert_eq!(ran(&log), ["git:status", "ci:status", "pr:status"]);
    }

    #[tokio::test]
    async fn test_fail_fast_on_error() {
        let (d, log) = dispatcher(
            json!({ "abc": ["a", "b", "c"] }),
            json!({ "a": "test:ok", "b": "test:throw", "c": "test:ok" }),
            PatternSet::default(),
        );
        let result = d.run_recipe("abc", Args::new()).await.unwrap();

        assert!(!result.success);
        assert_eq!(result.steps.len(), 2);
        assert!(result.steps[0].success);
        assert!(!result.steps[1].success);
        assert!(result.steps[1].error.as_deref().unwrap().contains("b blew up"));
        assert_eq!(ran(&log), ["a", "b"]);
    }

    #[tokio::test]
    async fn test_smart_stop_on_failed_tests() {
        let (d, log) = dispatcher(
            json!({ "deploy-flow": ["build", "test", "deploy"] }),
            json!({ "build": "test:ok", "test": "test:failed", "deploy": "test:ok" }),
            PatternSet::default(),
        );
        let result = d.run_recipe("deploy-flow", Args::new()).await.unwrap();

        assert_eq!(result.steps.len(), 2);
        assert_eq!(ran(&log), ["build", "test"]);
        // Only recorded steps count, and the failed test did not throw
        assert!(result.success);
        assert!(result.steps[1].result.as_ref().unwrap().is_failed());
    }

    #[tokio::test]
    async fn test_failed_flag_on_other_steps_does_not_stop() {
        let (d, log) = dispatcher(
            json!({ "quality": ["quality:lint", "deploy"] }),
            json!({ "quality:lint": "test:failed", "deploy": "test:ok" }),
            PatternSet::default(),
        );
        let result = d.run_recipe("quality", Args::new()).await.unwrap();
        assert_eq!(result.steps.len(), 2);
        assert_eq!(ran(&log), ["quality:lint", "deploy"]);
    }

    #[tokio::test]
    async fn test_commit_push_stops_when_commit_throws() {
        let (d, log) = dispatcher(
            json!({ "commit-push": ["git:commit", "ci:smart-push", "ci:monitor"] }),
            json!({
                "git:commit": "test:throw",
                "ci:smart-push": "test:ok",
                "ci:monitor": "test:ok"
            }),
            PatternSet::default(),
        );
        let result = d.run_recipe("commit-push", Args::new()).await.unwrap();
        assert_eq!(result.steps.len(), 1);
        assert!(!result.success);
        assert_eq!(ran(&log), ["git:commit"]);
    }

    #[tokio::test]
    async fn test_unknown_recipe() {
        let (d, _) = dispatcher(json!({}), json!({}), PatternSet::default());
        let err = d.run_recipe("nope", Args::new()).await.unwrap_err();
        assert!(matches!(err, DispatchError::UnknownRecipe(ref n) if n == "nope"));
    }

    #[tokio::test]
    async fn test_unknown_step_is_recorded_not_thrown() {
        let (d, _) = dispatcher(
            json!({ "r": ["mystery"] }),
            json!({}),
            PatternSet::default(),
        );
        let result = d.run_recipe("r", Args::new()).await.unwrap();
        assert!(!result.success);
        let error = result.steps[0].error.as_deref().unwrap();
        assert!(error.contains("Unknown command: mystery"));
    }

    #[tokio::test]
    async fn test_nested_recipes_and_phrases() {
        let run_tests = PatternAction::Command("test".into());
        let rule = PatternRule::new("tests", Locale::Primary, r"^run tests$", run_tests);
        let patterns = PatternSet::new(vec![], vec![rule.unwrap()]);
        let (d, log) = dispatcher(
            json!({ "release": ["quality", "publish"], "quality": ["lint", "run tests"] }),
            json!({ "lint": "test:ok", "test": "test:ok", "publish": "test:ok" }),
            patterns,
        );
        let result = d.run_recipe("release", Args::new()).await.unwrap();

        assert!(result.success);
        assert_eq!(ran(&log), ["lint", "test", "publish"]);
        let Some(Outcome::Recipe(inner)) = &result.steps[0].result else {
            panic!("expected nested recipe result");
        };
        assert_eq!(inner.recipe, "quality");
    }

    #[tokio::test]
    async fn test_context_reaches_every_step() {
        let (d, _) = dispatcher(
            json!({ "r": ["a", "b"] }),
            json!({ "a": "test:ok", "b": "test:ok" }),
            PatternSet::default(),
        );
        let mut context = Args::new();
        context.insert("message".into(), json!("wip"));
        let result = d.run_recipe("r", context).await.unwrap();
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_self_referencing_recipe_hits_depth_limit() {
        let (d, _) = dispatcher(
            json!({ "loop": ["loop"] }),
            json!({}),
            PatternSet::default(),
        );
        let result = d.run_recipe("loop", Args::new()).await.unwrap();

        // Only the innermost level records the error; outer levels got a result back
        assert_eq!(result.steps.len(), 1);
        let mut current = &result;
        let mut levels = 1;
        while let Some(Outcome::Recipe(inner)) = &current.steps[0].result {
            current = inner;
            levels += 1;
        }
        assert_eq!(levels, 5);
        assert!(!current.success);
        assert!(current.steps[0].error.as_deref().unwrap().contains("nesting exceeded 4"));
    }
}
