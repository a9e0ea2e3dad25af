//! Function registry.

use crate::DispatchError;
use compact_str::CompactString;
use llm::Function;
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt, future::Future, pin::Pin, sync::Arc};

/// Parsed function arguments.
pub type Arguments = Map<String, Value>;

/// A type-erased async function handler.
pub type Handler = Arc<
    dyn Fn(Arguments) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send>>
        + Send
        + Sync,
>;

/// Name to handler mapping, plus the schema shown to the model.
///
/// Built once at startup and handed to the runtime, which never
/// mutates it.
#[derive(Clone, Default)]
pub struct Registry {
    functions: BTreeMap<CompactString, (Function, Handler)>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function with its handler.
    pub fn register<F, Fut>(&mut self, function: Function, handler: F)
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        let name = function.name.clone();
        let handler: Handler = Arc::new(move |args| Box::pin(handler(args)));
        if self.functions.insert(name.clone(), (function, handler)).is_some() {
            tracing::debug!("replaced handler of function {name}");
        }
    }

    /// Builder-style [`Registry::register`].
    pub fn with<F, Fut>(mut self, function: Function, handler: F) -> Self
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        self.register(function, handler);
        self
    }

    /// The function schemas, ordered by name.
    pub fn schema(&self) -> Vec<Function> {
        self.functions
            .values()
            .map(|(function, _)| function.clone())
            .collect()
    }

    /// Whether a function is registered under this name.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether no function is registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Invoke the function registered under `name`.
    pub async fn call(&self, name: &str, args: Arguments) -> Result<String, DispatchError> {
        let (_, handler) = self
            .functions
            .get(name)
            .ok_or_else(|| DispatchError::UnknownFunction(name.into()))?;
        handler(args)
            .await
            .map_err(|source| DispatchError::Execution {
                name: name.into(),
                source,
            })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.functions.keys()).finish()
    }
}
