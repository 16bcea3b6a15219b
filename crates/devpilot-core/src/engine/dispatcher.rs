//! Command resolution and routing.
//!
//! Resolution order is fixed:
//! 1. Natural-language patterns
//! 2. Exact recipe name
//! 3. Direct routing: `search` / `read` / `write`, then the registry,
//!    then `help`, otherwise `UnknownCommand`

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::help::render_help;
use super::patterns::ResolvedAction;
use super::{DispatchError, RecipeEngine, ScriptLoader};
use crate::config::{EngineConfig, HELP_COMMAND};
use crate::domain::{Args, CommandResult, Outcome, RecipeResult, merge_args};
use crate::ports::{HandlerFactory, SearchQuery, Workspace};

/// Built-in command names served by the workspace port.
pub const SEARCH_COMMAND: &str = "search";
pub const READ_COMMAND: &str = "read";
pub const WRITE_COMMAND: &str = "write";

/// Names handled without the registry.
pub const BUILTIN_COMMANDS: &[&str] = &[SEARCH_COMMAND, READ_COMMAND, WRITE_COMMAND, HELP_COMMAND];

/// What `execute` would do with an input, without doing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Recipe {
        name: String,
        steps: Vec<String>,
        rule: Option<String>,
    },
    UnknownRecipe {
        name: String,
        rule: Option<String>,
    },
    Builtin {
        name: String,
        args: Args,
        rule: Option<String>,
    },
    Command {
        name: String,
        handler: String,
        args: Args,
        rule: Option<String>,
    },
    Help {
        rule: Option<String>,
    },
    Unknown {
        name: String,
        rule: Option<String>,
    },
}

/// The engine entry point.
///
/// Owns the immutable configuration, the handler cache and the workspace
/// used by built-in commands. Safe to share between tasks behind an `Arc`.
pub struct Dispatcher {
    config: Arc<EngineConfig>,
    loader: ScriptLoader,
    workspace: Arc<dyn Workspace>,
}

impl Dispatcher {
    pub fn new(
        config: EngineConfig,
        factory: Arc<dyn HandlerFactory>,
        workspace: Arc<dyn Workspace>,
    ) -> Self {
        let loader = ScriptLoader::new(config.commands.clone(), factory);
        Self {
            config: Arc::new(config),
            loader,
            workspace,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub const fn loader(&self) -> &ScriptLoader {
        &self.loader
    }

    /// Recipe runner bound to this dispatcher.
    pub const fn recipes(&self) -> RecipeEngine<'_> {
        RecipeEngine::new(self)
    }

    /// Resolve `input` and run whatever it names.
    pub async fn execute(&self, input: &str, args: Args) -> Result<Outcome, DispatchError> {
        self.execute_at(input, args, 0).await
    }

    /// Run a recipe by name.
    pub async fn run_recipe(&self, name: &str, args: Args) -> Result<RecipeResult, DispatchError> {
        self.recipes().run_recipe(name, args).await
    }

    /// Re-entrant execution used by the recipe runner.
    ///
    /// `depth` counts enclosing recipes. Boxed so recipes can call back in.
    pub(crate) fn execute_at<'a>(
        &'a self,
        input: &'a str,
        args: Args,
        depth: usize,
    ) -> BoxFuture<'a, Result<Outcome, DispatchError>> {
        Box::pin(async move {
            let input = input.trim();
            let limit = self.config.settings.max_depth;
            if depth > limit {
                return Err(DispatchError::RecursionLimit {
                    input: input.to_string(),
                    limit,
                });
            }

            if let Some(action) = self.config.patterns.match_input(input) {
                debug!(input, depth, action = ?action, "Input matched pattern");
                return match action {
                    ResolvedAction::Recipe { name } => self
                        .recipes()
                        .run_at(&name, args, depth)
                        .await
                        .map(Outcome::Recipe),
                    ResolvedAction::Command {
                        name,
                        args: extracted,
                    } => self.route(&name, merge_args(&args, &extracted)).await,
                };
            }

            if self.config.has_recipe(input) {
                debug!(input, depth, "Input names a recipe");
                return self
                    .recipes()
                    .run_at(input, args, depth)
                    .await
                    .map(Outcome::Recipe);
            }

            self.route(input, args).await
        })
    }

    /// Direct routing of a literal command name.
    async fn route(&self, command: &str, args: Args) -> Result<Outcome, DispatchError> {
        debug!(command, "Routing command");
        match command {
            SEARCH_COMMAND => return self.search(args).await.map(Outcome::Command),
            READ_COMMAND => return self.read(args).await.map(Outcome::Command),
            WRITE_COMMAND => return self.write(args).await.map(Outcome::Command),
            _ => {}
        }

        if let Some(Some(_)) = self.config.command(command) {
            let handler = self.loader.load(command).await?;
            info!(command, "Running command");
            let result = handler
                .run(args)
                .await
                .map_err(|source| DispatchError::Handler {
                    command: command.to_string(),
                    source,
                })?;
            return Ok(Outcome::Command(result));
        }

        if command == HELP_COMMAND {
            let text = render_help(&self.config);
            return Ok(Outcome::Command(
                CommandResult::ok().with_status("help").with_message(text),
            ));
        }

        Err(DispatchError::unknown_command(command))
    }

    async fn search(&self, args: Args) -> Result<CommandResult, DispatchError> {
        let pattern = required_string(&args, SEARCH_COMMAND, "query")?;
        let query = SearchQuery {
            pattern: pattern.clone(),
            path: optional_string(&args, "path"),
            limit: args
                .get("limit")
                .and_then(Value::as_u64)
                .and_then(|n| usize::try_from(n).ok()),
        };

        let hits = self.workspace.search(&query).await?;
        let count = hits.len();
        Ok(CommandResult::ok()
            .with_status("ok")
            .with_message(format!("{count} match(es) for '{pattern}'"))
            .with_data(json!({ "query": pattern, "count": count, "matches": hits })))
    }

    async fn read(&self, args: Args) -> Result<CommandResult, DispatchError> {
        let path = required_string(&args, READ_COMMAND, "path")?;
        let content = self.workspace.read(&path).await?;
        let bytes = content.len();
        Ok(CommandResult::ok()
            .with_status("ok")
            .with_data(json!({ "path": path, "bytes": bytes, "content": content })))
    }

    async fn write(&self, args: Args) -> Result<CommandResult, DispatchError> {
        let path = required_string(&args, WRITE_COMMAND, "path")?;
        let content = required_string(&args, WRITE_COMMAND, "content")?;
        let bytes = self.workspace.write(&path, &content).await?;
        Ok(CommandResult::ok()
            .with_status("ok")
            .with_message(format!("Wrote {bytes} bytes to {path}"))
            .with_data(json!({ "path": path, "bytes": bytes })))
    }

    /// Preview the resolution of `input` without executing anything.
    pub fn resolve(&self, input: &str) -> Resolution {
        let input = input.trim();
        let (name, args, rule) = match self.config.patterns.explain(input) {
            Some(explained) => match explained.action {
                ResolvedAction::Recipe { name } => {
                    return self.recipe_resolution(name, Some(explained.rule_id));
                }
                ResolvedAction::Command { name, args } => (name, args, Some(explained.rule_id)),
            },
            None if self.config.has_recipe(input) => {
                return self.recipe_resolution(input.to_string(), None);
            }
            None => (input.to_string(), Args::new(), None),
        };

        if [SEARCH_COMMAND, READ_COMMAND, WRITE_COMMAND].contains(&name.as_str()) {
            return Resolution::Builtin { name, args, rule };
        }
        if let Some(Some(handler)) = self.config.command(&name) {
            return Resolution::Command {
                handler: handler.to_string(),
                name,
                args,
                rule,
            };
        }
        if name == HELP_COMMAND {
            return Resolution::Help { rule };
        }
        Resolution::Unknown { name, rule }
    }

    fn recipe_resolution(&self, name: String, rule: Option<String>) -> Resolution {
        match self.config.recipe(&name) {
            Some(steps) => Resolution::Recipe {
                steps: steps.to_vec(),
                name,
                rule,
            },
            None => Resolution::UnknownRecipe { name, rule },
        }
    }
}

fn optional_string(args: &Args, key: &str) -> Option<String> {
    match args.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn required_string(args: &Args, command: &str, key: &str) -> Result<String, DispatchError> {
    optional_string(args, key).ok_or_else(|| DispatchError::MissingArgument {
        command: command.to_string(),
        key: key.to_string(),
    })
}
