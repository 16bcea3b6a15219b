//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Config discovery and loading (via devpilot-core)
//! - `exec:` handler factory and filesystem workspace (via devpilot-runtime)
//! - The `Dispatcher` that handlers drive
//!
//! Command handlers receive the composed `CliContext`.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use devpilot_core::paths::{CONFIG_ENV_VAR, resolve_config_path_from, user_config_path};
use devpilot_core::{ConfigLocation, Dispatcher, EngineConfig, HandlerFactory, Workspace};
use devpilot_runtime::{ExecHandlerFactory, FsWorkspace};
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// `--config` value, if given.
    pub config_path: Option<PathBuf>,
    /// Value of `DEVPILOT_CONFIG`, if set.
    pub config_env: Option<String>,
    /// Project directory commands run in.
    pub working_dir: PathBuf,
}

impl CliConfig {
    /// Build from parsed arguments and the process environment.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let cwd = env::current_dir()?;
        let working_dir = match &cli.dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd,
        };
        if !working_dir.is_dir() {
            return Err(CliError::Arguments(format!(
                "{} is not a directory",
                working_dir.display()
            )));
        }

        Ok(Self {
            config_path: cli.config.clone(),
            config_env: env::var(CONFIG_ENV_VAR).ok(),
            working_dir,
        })
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// The engine entry point.
    pub dispatcher: Arc<Dispatcher>,
    /// Where the config file was found.
    pub location: ConfigLocation,
    /// Project directory.
    pub working_dir: PathBuf,
}

impl CliContext {
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn config(&self) -> &EngineConfig {
        self.dispatcher.config()
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

/// Bootstrap the CLI application.
///
/// This is the composition root. It:
/// 1. Locates the config file (flag, env var, project file, user file)
/// 2. Layers it over the built-in defaults
/// 3. Creates the `exec:` factory and workspace rooted at the project
/// 4. Assembles the dispatcher
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let location = resolve_config_path_from(
        config.config_path.as_deref(),
        config.config_env.as_deref(),
        &config.working_dir,
        user_config_path(),
    )?;
    debug!(source = %location.source, path = ?location.path, "Resolved config");

    let engine_config = EngineConfig::load(&location)?;
    let factory = Arc::new(ExecHandlerFactory::new(&config.working_dir));
    let workspace = Arc::new(FsWorkspace::new(&config.working_dir));

    Ok(bootstrap_with(
        engine_config,
        factory,
        workspace,
        location,
        config.working_dir,
    ))
}

/// Bootstrap with custom adapters (for testing).
pub fn bootstrap_with(
    config: EngineConfig,
    factory: Arc<dyn HandlerFactory>,
    workspace: Arc<dyn Workspace>,
    location: ConfigLocation,
    working_dir: PathBuf,
) -> CliContext {
    CliContext {
        dispatcher: Arc::new(Dispatcher::new(config, factory, workspace)),
        location,
        working_dir,
    }
}
