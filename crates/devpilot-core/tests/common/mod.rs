//! Shared test doubles for the engine integration tests.
//!
//! `RecordingFactory` accepts any handler reference and hands out commands
//! that record their invocation instead of running anything. Individual
//! command names can be scripted to fail.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use devpilot_core::{
    Args, Command, CommandError, CommandResult, Dispatcher, EngineConfig, HandlerFactory,
    HandlerRef, LoadError, SearchHit, SearchQuery, Workspace, WorkspaceError,
};

/// How a recorded command responds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Succeed,
    /// Returns a result with `failed: true`.
    ReportFailure,
    /// Returns a `CommandError`.
    Throw,
}

pub type Calls = Arc<Mutex<Vec<(String, Args)>>>;

struct RecordingCommand {
    name: String,
    behaviour: Behaviour,
    calls: Calls,
}

#[async_trait]
impl Command for RecordingCommand {
    async fn run(&self, args: Args) -> Result<CommandResult, CommandError> {
        self.calls.lock().unwrap().push((self.name.clone(), args));
        match self.behaviour {
            Behaviour::Succeed => Ok(CommandResult::ok().with_status("ok")),
            Behaviour::ReportFailure => Ok(CommandResult::failure(format!("{} failed", self.name))),
            Behaviour::Throw => Err(CommandError::Failed(format!("{} crashed", self.name))),
        }
    }
}

#[derive(Default)]
pub struct RecordingFactory {
    pub calls: Calls,
    behaviours: HashMap<String, Behaviour>,
    pub instantiated: Arc<Mutex<Vec<String>>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, behaviour: Behaviour) -> Self {
        self.behaviours.insert(name.to_string(), behaviour);
        self
    }
}

impl HandlerFactory for RecordingFactory {
    fn instantiate(
        &self,
        name: &str,
        _handler_ref: &HandlerRef,
    ) -> Result<Arc<dyn Command>, LoadError> {
        self.instantiated.lock().unwrap().push(name.to_string());
        let behaviour = self.behaviours.get(name).copied();
        Ok(Arc::new(RecordingCommand {
            name: name.to_string(),
            behaviour: behaviour.unwrap_or(Behaviour::Succeed),
            calls: Arc::clone(&self.calls),
        }))
    }
}

/// Workspace that records search queries and returns no hits.
#[derive(Default)]
pub struct RecordingWorkspace {
    pub queries: Arc<Mutex<Vec<SearchQuery>>>,
}

#[async_trait]
impl Workspace for RecordingWorkspace {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, WorkspaceError> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(Vec::new())
    }

    async fn read(&self, path: &str) -> Result<String, WorkspaceError> {
        Err(WorkspaceError::NotFound(path.to_string()))
    }

    async fn write(&self, _path: &str, content: &str) -> Result<u64, WorkspaceError> {
        Ok(content.len() as u64)
    }
}

/// Test harness around a dispatcher built from the embedded defaults.
pub struct Harness {
    pub dispatcher: Dispatcher,
    pub calls: Calls,
    pub instantiated: Arc<Mutex<Vec<String>>>,
    pub queries: Arc<Mutex<Vec<SearchQuery>>>,
}

impl Harness {
    pub fn builtin(factory: RecordingFactory) -> Self {
        Self::with_config(EngineConfig::builtin().unwrap(), factory)
    }

    pub fn with_config(config: EngineConfig, factory: RecordingFactory) -> Self {
        let calls = Arc::clone(&factory.calls);
        let instantiated = Arc::clone(&factory.instantiated);
        let workspace = RecordingWorkspace::default();
        let queries = Arc::clone(&workspace.queries);
        Self {
            dispatcher: Dispatcher::new(config, Arc::new(factory), Arc::new(workspace)),
            calls,
            instantiated,
            queries,
        }
    }

    /// Names of the commands invoked so far, in order.
    pub fn invoked(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Arguments of the `index`-th invocation.
    pub fn args(&self, index: usize) -> Args {
        self.calls.lock().unwrap()[index].1.clone()
    }
}
