//! Name -> processor registry.

use std::sync::Arc;

use crate::{MungeError, MungeResult};

use super::builtin::{Bootstrap, Diff, Stats};
use super::traits::Processor;

/// Registered processors, in registration order.
///
/// Entries are immutable once registered; lookups hand out shared handles.
#[derive(Default, Clone)]
pub struct ProcessorRegistry {
    processors: Vec<Arc<dyn Processor>>,
}

impl ProcessorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        ProcessorRegistry::default()
    }

    /// Registry holding the built-in processors.
    pub fn with_builtins() -> Self {
        let mut registry = ProcessorRegistry::new();
        let builtins: [Arc<dyn Processor>; 3] = [
            Arc::new(Stats),
            Arc::new(Bootstrap::default()),
            Arc::new(Diff),
        ];
        for processor in builtins {
            registry.processors.push(processor);
        }
        registry
    }

    /// Register a processor. Fails if the name is taken.
    pub fn register(&mut self, processor: impl Processor + 'static) -> MungeResult<()> {
        self.register_arc(Arc::new(processor))
    }

    pub fn register_arc(&mut self, processor: Arc<dyn Processor>) -> MungeResult<()> {
        if self.contains(processor.name()) {
            return Err(MungeError::DuplicateProcessor(processor.name().to_string()));
        }
        self.processors.push(processor);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> MungeResult<Arc<dyn Processor>> {
        self.processors
            .iter()
            .find(|p| p.name() == name)
            .cloned()
            .ok_or_else(|| MungeError::UnknownProcessor(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.processors.iter().any(|p| p.name() == name)
    }

    /// Processor names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Processor>> {
        self.processors.iter()
    }
}
