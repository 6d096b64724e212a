//! Engine module: coordinates registry, resolver and PRNG for each run.
//!
//! # Architecture
//!
//! - **PrngManager** (`prng`): creates one independently seeded generator per
//!   execution and reports the effective seed.
//! - **Engine** (`execution`): validates the request against the processor's
//!   arity, resolves inputs, seeds, invokes the processor and times it.
//!
//! # Boundaries
//!
//! - The engine performs no I/O of its own beyond collector resolution.
//! - Rendering results is the job of `crate::report`.

pub mod execution;
pub mod prng;

// Re-export key types for convenience
pub use execution::{Engine, Execution};
pub use prng::{PrngManager, SeedPolicy, SeededRng};
