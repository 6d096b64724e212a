//! Reporting module for processor results.
//!
//! This module provides:
//! - `format_results`: the verbosity/precision-aware results renderer
//! - Run summary helpers used by the CLI (date, inputs, elapsed time, seed)

pub mod format;
pub mod summary;

// Re-export key types
pub use format::{DEBUG_VERBOSITY, DEFAULT_PRECISION, format_float, format_results};
pub use summary::{date_desc, input_desc, render_summary, seed_desc, time_desc};
