//! `exec:` and `check:` handlers backed by external programs.
//!
//! Both schemes run a program the same way. They differ in how a
//! non-zero exit is reported: `exec:` returns `CommandError::Failed`,
//! `check:` returns a result flagged `failed`.

mod template;
mod tokenize;

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use devpilot_core::{
    Args, Command, CommandError, CommandResult, HandlerFactory, HandlerRef, LoadError,
};
use serde_json::{Value, json};
use tokio::process::Command as Process;
use tracing::{debug, warn};

pub use template::render;
pub use tokenize::tokenize;

/// Scheme for commands whose non-zero exit is an error.
pub const EXEC_SCHEME: &str = "exec";

/// Scheme for checks whose non-zero exit is a reported failure.
pub const CHECK_SCHEME: &str = "check";

/// Argument holding extra arguments appended to the command line.
const ARGV_KEY: &str = "argv";

/// Builds [`ExecCommand`]s for `exec:` and `check:` references.
#[derive(Debug, Clone)]
pub struct ExecHandlerFactory {
    working_dir: PathBuf,
}

impl ExecHandlerFactory {
    /// Commands built by this factory run in `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

impl HandlerFactory for ExecHandlerFactory {
    fn instantiate(
        &self,
        name: &str,
        handler_ref: &HandlerRef,
    ) -> Result<Arc<dyn Command>, LoadError> {
        let check = match handler_ref.scheme() {
            Some(EXEC_SCHEME) => false,
            Some(CHECK_SCHEME) => true,
            other => {
                return Err(LoadError::UnsupportedScheme(
                    other.unwrap_or(handler_ref.as_str()).to_string(),
                ));
            }
        };

        let target = handler_ref.target().unwrap_or_default();
        let mut tokens = tokenize(target).map_err(LoadError::Invalid)?.into_iter();
        let program = tokens
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| LoadError::Invalid(format!("'{handler_ref}' names no program")))?;

        let command = ExecCommand {
            name: name.to_string(),
            program,
            args: tokens.collect(),
            working_dir: self.working_dir.clone(),
            check,
        };
        debug!(command = name, program = %command.program, check, "Prepared exec handler");
        Ok(Arc::new(command))
    }
}

/// A command that runs an external program and captures its output.
#[derive(Debug, Clone)]
pub struct ExecCommand {
    name: String,
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
    check: bool,
}

impl ExecCommand {
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether a non-zero exit is reported as a failed result.
    pub const fn is_check(&self) -> bool {
        self.check
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Command line for one invocation: placeholders filled, `argv` appended.
    pub fn command_line(&self, args: &Args) -> Result<Vec<String>, CommandError> {
        let mut line = self
            .args
            .iter()
            .map(|arg| render(arg, args))
            .collect::<Result<Vec<_>, _>>()?;

        match args.get(ARGV_KEY) {
            None | Some(Value::Null) => {}
            Some(Value::Array(extra)) => {
                for value in extra {
                    match value {
                        Value::String(s) => line.push(s.clone()),
                        other => line.push(other.to_string()),
                    }
                }
            }
            Some(Value::String(extra)) => {
                line.extend(tokenize(extra).map_err(CommandError::Failed)?);
            }
            Some(other) => line.push(other.to_string()),
        }
        Ok(line)
    }
}

#[async_trait]
impl Command for ExecCommand {
    async fn run(&self, args: Args) -> Result<CommandResult, CommandError> {
        let line = self.command_line(&args)?;
        debug!(command = %self.name, program = %self.program, args = ?line, "Spawning");

        let output = Process::new(&self.program)
            .args(&line)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| CommandError::Spawn {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        let stdout = lossy(&output.stdout);
        let stderr = lossy(&output.stderr);
        let code = output.status.code();
        let data = json!({ "stdout": stdout, "stderr": stderr, "code": code });

        if output.status.success() {
            let mut result = CommandResult::ok().with_status("ok").with_data(data);
            if !stdout.is_empty() {
                result = result.with_message(stdout);
            }
            return Ok(result);
        }

        warn!(
            command = %self.name,
            code = ?code,
            check = self.check,
            "Command exited with failure"
        );
        let error = if stderr.is_empty() {
            code.map_or_else(
                || format!("{} terminated by signal", self.program),
                |c| format!("{} exited with code {c}", self.program),
            )
        } else {
            stderr
        };

        if self.check {
            Ok(CommandResult::failure(error)
                .with_status("failed")
                .with_data(data))
        } else {
            Err(CommandError::Failed(error))
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end().to_string()
}
