//! Lazy, memoized handler loading.
//!
//! The loader owns the only mutable state in the engine: a map from command
//! name to live handler. A handler is instantiated on first use and reused
//! afterwards. The map lock is held across instantiation so concurrent
//! first requests for the same name still produce a single instance.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::DispatchError;
use crate::ports::{Command, HandlerFactory, HandlerRef};

/// Memoizing handler loader.
pub struct ScriptLoader {
    registry: BTreeMap<String, Option<HandlerRef>>,
    factory: Arc<dyn HandlerFactory>,
    handles: Mutex<HashMap<String, Arc<dyn Command>>>,
}

impl ScriptLoader {
    /// Create a loader over a command registry.
    pub fn new(
        registry: BTreeMap<String, Option<HandlerRef>>,
        factory: Arc<dyn HandlerFactory>,
    ) -> Self {
        Self {
            registry,
            factory,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Get the handler for `name`, instantiating it on first use.
    ///
    /// # Errors
    ///
    /// `DispatchError::Import` when the registry has no handler for `name`
    /// or the factory cannot build it. Failures are not cached.
    pub async fn load(&self, name: &str) -> Result<Arc<dyn Command>, DispatchError> {
        let mut handles = self.handles.lock().await;
        if let Some(handle) = handles.get(name) {
            trace!(command = name, "Handler cache hit");
            return Ok(Arc::clone(handle));
        }

        let handler_ref = self
            .registry
            .get(name)
            .and_then(Option::as_ref)
            .ok_or_else(|| DispatchError::Import {
                name: name.to_string(),
                reason: "no handler registered".to_string(),
            })?;

        let handle = self
            .factory
            .instantiate(name, handler_ref)
            .map_err(|e| DispatchError::Import {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        debug!(command = name, handler = %handler_ref, "Instantiated handler");
        handles.insert(name.to_string(), Arc::clone(&handle));
        Ok(handle)
    }

    /// Number of handlers instantiated so far.
    pub async fn cached(&self) -> usize {
        self.handles.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Args, CommandResult};
    use crate::ports::{CommandError, LoadError, MockHandlerFactory};
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Command for Noop {
        async fn run(&self, _args: Args) -> Result<CommandResult, CommandError> {
            Ok(CommandResult::ok())
        }
    }

    fn registry() -> BTreeMap<String, Option<HandlerRef>> {
        let mut registry = BTreeMap::new();
        let lint = HandlerRef::new("exec:npx eslint .");
        registry.insert("quality:lint".to_string(), Some(lint));
        registry.insert("help".to_string(), None);
        registry
    }

    #[tokio::test]
    async fn test_instantiates_once_per_name() {
        let mut factory = MockHandlerFactory::new();
        factory
            .expect_instantiate()
            .withf(|name, handler_ref| {
                name == "quality:lint" && handler_ref.as_str() == "exec:npx eslint ."
            })
            .times(1)
            .returning(|_, _| Ok(Arc::new(Noop) as Arc<dyn Command>));

        let loader = ScriptLoader::new(registry(), Arc::new(factory));
        let first = loader.load("quality:lint").await.unwrap();
        let second = loader.load("quality:lint").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.cached().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_use_instantiates_once() {
        let mut factory = MockHandlerFactory::new();
        factory
            .expect_instantiate()
            .times(1)
            .returning(|_, _| Ok(Arc::new(Noop) as Arc<dyn Command>));

        let loader = Arc::new(ScriptLoader::new(registry(), Arc::new(factory)));
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let loader = Arc::clone(&loader);
                tokio::spawn(async move { loader.load("quality:lint").await.is_ok() })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap());
        }
        assert_eq!(loader.cached().await, 1);
    }

    #[tokio::test]
    async fn test_unregistered_name_is_import_error() {
        let mut factory = MockHandlerFactory::new();
        factory.expect_instantiate().times(0);

        let loader = ScriptLoader::new(registry(), Arc::new(factory));
        let err = loader.load("deploy").await.err().unwrap();
        assert!(matches!(err, DispatchError::Import { ref name, .. } if name == "deploy"));
    }

    #[tokio::test]
    async fn test_null_handler_is_import_error() {
        let mut factory = MockHandlerFactory::new();
        factory.expect_instantiate().times(0);

        let loader = ScriptLoader::new(registry(), Arc::new(factory));
        assert!(matches!(
            loader.load("help").await,
            Err(DispatchError::Import { .. })
        ));
    }

    #[tokio::test]
    async fn test_factory_failure_is_not_cached() {
        let mut factory = MockHandlerFactory::new();
        factory
            .expect_instantiate()
            .times(2)
            .returning(|_, _| Err(LoadError::UnsupportedScheme("node".into())));

        let loader = ScriptLoader::new(registry(), Arc::new(factory));
        for _ in 0..2 {
            let err = loader.load("quality:lint").await.err().unwrap();
            assert!(err.to_string().contains("Unsupported handler scheme: node"));
        }
        assert_eq!(loader.cached().await, 0);
    }
}
