//! In-memory collector for tests and embedding.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value as JsonValue;

use crate::{MungeError, MungeResult};

use super::traits::{Collector, CollectorSession};

/// Collector backed by a key -> payload map.
///
/// Tracks how many sessions were opened and how many are still live, so
/// callers can check that resolution releases its handles.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollector {
    name: String,
    entries: BTreeMap<String, JsonValue>,
    open_fails: bool,
    opened: Arc<AtomicUsize>,
    live: Arc<AtomicUsize>,
}

impl MemoryCollector {
    /// Create an empty collector with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        MemoryCollector {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a dataset under `key`.
    pub fn with_entry(mut self, key: impl Into<String>, payload: JsonValue) -> Self {
        self.entries.insert(key.into(), payload);
        self
    }

    /// Make `open` fail.
    pub fn open_fails(mut self) -> Self {
        self.open_fails = true;
        self
    }

    /// Number of sessions opened so far.
    pub fn sessions_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of sessions not yet released.
    pub fn sessions_live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl Collector for MemoryCollector {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> MungeResult<Box<dyn CollectorSession + '_>> {
        if self.open_fails {
            return Err(MungeError::Message(format!(
                "collector '{}' is unavailable",
                self.name
            )));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession { collector: self }))
    }
}

struct MemorySession<'a> {
    collector: &'a MemoryCollector,
}

impl CollectorSession for MemorySession<'_> {
    fn fetch(&mut self, key: &str) -> MungeResult<Option<JsonValue>> {
        Ok(self.collector.entries.get(key).cloned())
    }

    fn keys(&mut self) -> MungeResult<Vec<String>> {
        Ok(self.collector.entries.keys().cloned().collect())
    }
}

impl Drop for MemorySession<'_> {
    fn drop(&mut self) {
        self.collector.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_collector_fetch() {
        let collector = MemoryCollector::new("srs").with_entry("0", json!([1, 2]));
        let mut session = collector.open().unwrap();

        assert_eq!(session.fetch("0").unwrap(), Some(json!([1, 2])));
        assert_eq!(session.fetch("1").unwrap(), None);
        assert_eq!(session.keys().unwrap(), vec!["0".to_string()]);
    }

    #[test]
    fn test_memory_session_released_on_drop() {
        let collector = MemoryCollector::new("srs");
        {
            let _session = collector.open().unwrap();
            assert_eq!(collector.sessions_live(), 1);
        }
        assert_eq!(collector.sessions_live(), 0);
        assert_eq!(collector.sessions_opened(), 1);
    }

    #[test]
    fn test_memory_collector_open_fails() {
        let collector = MemoryCollector::new("srs").open_fails();
        assert!(collector.open().is_err());
        assert_eq!(collector.sessions_opened(), 0);
    }
}
