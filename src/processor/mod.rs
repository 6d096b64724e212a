//! Processor abstraction and registry.
//!
//! A `Processor` is a named computation over one or more datasets. Processors
//! receive their randomness through `RunContext` so that a seeded run is
//! reproducible, and report results as a `Results` tree.

pub mod builtin;
pub mod mock;
pub mod registry;
pub mod traits;

// Re-export key types
pub use builtin::{Bootstrap, Diff, Stats};
pub use mock::{MockConfig, MockProcessor};
pub use registry::ProcessorRegistry;
pub use traits::{CancelToken, Processor, ProcessorError, RunContext};
