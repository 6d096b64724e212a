//! Collector store contract.

use serde_json::Value as JsonValue;

use crate::MungeResult;

/// A named source of previously collected datasets.
pub trait Collector: Send + Sync {
    /// Returns the collector name used in input references (e.g., "srs").
    fn name(&self) -> &str;

    /// Open a read-only session on the store.
    ///
    /// The session holds whatever handle the store needs and releases it
    /// when dropped, including when resolution stops early on an error.
    fn open(&self) -> MungeResult<Box<dyn CollectorSession + '_>>;
}

/// A scoped, read-only view of one collector's namespace.
pub trait CollectorSession {
    /// Load the payload stored under `key`, or `None` if the key does not exist.
    fn fetch(&mut self, key: &str) -> MungeResult<Option<JsonValue>>;

    /// List all keys in the namespace, sorted.
    fn keys(&mut self) -> MungeResult<Vec<String>>;
}
