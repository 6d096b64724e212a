//! Core types and schemas for munge.
//!
//! This module contains the request/metadata model shared by the engine, the
//! formatter and the run history (`RunRecord` v1).

pub mod dataset;
pub mod schema;

// Re-export key types for convenience
pub use dataset::Dataset;
pub use schema::{
    Arity, ExecutionInfo, ExecutionRequest, InputRef, RunRecord, SCHEMA_VERSION, pair_tokens,
    parse_seed,
};
