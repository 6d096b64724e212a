//! Collector stores and input resolution.
//!
//! A `Collector` is a named namespace of previously gathered datasets. The
//! `InputResolver` turns ordered `(collector, key)` references into datasets,
//! opening one scoped session per collector for the duration of a resolve.

pub mod directory;
pub mod memory;
pub mod resolver;
pub mod traits;

// Re-export key types
pub use directory::DirectoryCollector;
pub use memory::MemoryCollector;
pub use resolver::InputResolver;
pub use traits::{Collector, CollectorSession};
