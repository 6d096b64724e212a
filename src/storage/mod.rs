//! Storage layer for run records.
//!
//! This module persists `RunRecord` data as a single pretty JSON report or as
//! an append-only JSONL history.

pub mod json;
pub mod jsonl;

pub use json::write_json;
pub use jsonl::RunHistory;
