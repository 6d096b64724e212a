//! Input resolution: `(collector, key)` references -> datasets.

use std::sync::Arc;

use tracing::debug;

use crate::core::{Dataset, InputRef};
use crate::{MungeError, MungeResult};

use super::traits::{Collector, CollectorSession};

/// Registry of collectors and resolver of input references.
#[derive(Default, Clone)]
pub struct InputResolver {
    collectors: Vec<Arc<dyn Collector>>,
}

impl InputResolver {
    pub fn new() -> Self {
        InputResolver::default()
    }

    /// Register a collector under its own name.
    pub fn register(&mut self, collector: impl Collector + 'static) -> MungeResult<()> {
        if self.collector(collector.name()).is_some() {
            return Err(MungeError::DuplicateCollector(collector.name().to_string()));
        }
        self.collectors.push(Arc::new(collector));
        Ok(())
    }

    /// Builder form of `register`.
    pub fn with_collector(mut self, collector: impl Collector + 'static) -> MungeResult<Self> {
        self.register(collector)?;
        Ok(self)
    }

    pub fn collector(&self, name: &str) -> Option<&dyn Collector> {
        self.collectors
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Collector names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    /// Resolve references into datasets, preserving order.
    ///
    /// Each collector is opened at most once per call; every session is
    /// released before returning, on success or failure.
    pub fn resolve(&self, inputs: &[InputRef]) -> MungeResult<Vec<Dataset>> {
        let mut sessions: Vec<(&str, Box<dyn CollectorSession + '_>)> = Vec::new();
        let mut datasets = Vec::with_capacity(inputs.len());

        for input in inputs {
            let collector = self
                .collector(&input.collector)
                .ok_or_else(|| MungeError::UnknownCollector(input.clone()))?;

            let idx = match sessions.iter().position(|(name, _)| *name == collector.name()) {
                Some(idx) => idx,
                None => {
                    sessions.push((collector.name(), collector.open()?));
                    sessions.len() - 1
                }
            };

            let payload = sessions[idx]
                .1
                .fetch(&input.key)?
                .ok_or_else(|| MungeError::MissingKey(input.clone()))?;
            debug!(input = %input, "resolved input");
            datasets.push(Dataset::new(input.clone(), payload));
        }

        Ok(datasets)
    }

    /// List every key of a collector.
    pub fn keys(&self, collector: &str) -> MungeResult<Vec<String>> {
        let found = self
            .collector(collector)
            .ok_or_else(|| MungeError::UnknownCollector(InputRef::new(collector, "")))?;
        found.open()?.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::MemoryCollector;
    use serde_json::json;

    fn srs() -> MemoryCollector {
        MemoryCollector::new("srs")
            .with_entry("0", json!([1.0, 2.0]))
            .with_entry("1", json!([3.0]))
    }

    #[test]
    fn test_resolve_preserves_order() {
        let resolver = InputResolver::new()
            .with_collector(srs())
            .unwrap()
            .with_collector(MemoryCollector::new("web").with_entry("a", json!("page")))
            .unwrap();

        let inputs = vec![
            InputRef::new("srs", "1"),
            InputRef::new("web", "a"),
            InputRef::new("srs", "0"),
        ];
        let datasets = resolver.resolve(&inputs).unwrap();

        let refs: Vec<&InputRef> = datasets.iter().map(|d| d.reference()).collect();
        assert_eq!(refs, inputs.iter().collect::<Vec<_>>());
        assert_eq!(datasets[0].payload(), &json!([3.0]));
        assert_eq!(datasets[1].payload(), &json!("page"));
    }

    #[test]
    fn test_resolve_unknown_collector() {
        let resolver = InputResolver::new().with_collector(srs()).unwrap();
        let err = resolver.resolve(&[InputRef::new("nope", "0")]).unwrap_err();
        match err {
            MungeError::UnknownCollector(r) => assert_eq!(r, InputRef::new("nope", "0")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_missing_key_names_reference() {
        let resolver = InputResolver::new().with_collector(srs()).unwrap();
        let err = resolver
            .resolve(&[InputRef::new("srs", "does-not-exist")])
            .unwrap_err();
        match err {
            MungeError::MissingKey(r) => assert_eq!(r, InputRef::new("srs", "does-not-exist")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_opens_each_collector_once_and_releases() {
        let collector = srs();
        let resolver = InputResolver::new().with_collector(collector.clone()).unwrap();

        resolver
            .resolve(&[InputRef::new("srs", "0"), InputRef::new("srs", "1")])
            .unwrap();
        assert_eq!(collector.sessions_opened(), 1);
        assert_eq!(collector.sessions_live(), 0);

        let _ = resolver.resolve(&[InputRef::new("srs", "0"), InputRef::new("srs", "9")]);
        assert_eq!(collector.sessions_live(), 0, "session released on failure");
    }

    #[test]
    fn test_register_duplicate_collector() {
        let mut resolver = InputResolver::new();
        resolver.register(srs()).unwrap();
        let err = resolver.register(MemoryCollector::new("srs")).unwrap_err();
        assert!(matches!(err, MungeError::DuplicateCollector(name) if name == "srs"));
        assert_eq!(resolver.names(), vec!["srs"]);
    }
}
