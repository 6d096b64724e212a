//! Processor trait, run context and processor-side errors.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::core::{Arity, Dataset};
use crate::results::Results;

/// Errors raised inside a processor implementation.
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("input {index} ({reference}): {reason}")]
    InvalidDataset {
        index: usize,
        reference: String,
        reason: String,
    },
    #[error("cancelled")]
    Cancelled,
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl ProcessorError {
    pub fn invalid(index: usize, dataset: &Dataset, reason: impl Into<String>) -> Self {
        ProcessorError::InvalidDataset {
            index,
            reference: dataset.reference().to_string(),
            reason: reason.into(),
        }
    }
}

/// Cooperative cancellation flag shared between a host and a running processor.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Per-execution state handed to a processor.
///
/// Owns the run's generator; nothing else in the process shares it.
pub struct RunContext {
    rng: StdRng,
    cancel: CancelToken,
}

impl RunContext {
    pub fn new(rng: StdRng, cancel: CancelToken) -> Self {
        RunContext { rng, cancel }
    }

    /// The run generator.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Derive an independent generator from the run generator.
    ///
    /// Children are a deterministic function of the run seed and the number
    /// of forks taken before them.
    pub fn fork_rng(&mut self) -> StdRng {
        StdRng::from_rng(&mut self.rng)
    }

    /// Fail with `Cancelled` once the host has cancelled this run.
    pub fn checkpoint(&self) -> Result<(), ProcessorError> {
        if self.cancel.is_cancelled() {
            return Err(ProcessorError::Cancelled);
        }
        Ok(())
    }
}

/// A named computation over resolved datasets.
pub trait Processor: Send + Sync {
    /// Returns the registry name (e.g., "stats").
    fn name(&self) -> &str;

    /// Number of inputs this processor accepts.
    fn arity(&self) -> Arity {
        Arity::VARIADIC
    }

    /// One-line description for listings.
    fn description(&self) -> &str {
        ""
    }

    /// Run over `datasets`, given in request order.
    ///
    /// All randomness must come from `ctx` for seeded runs to reproduce.
    fn run(&self, datasets: &[Dataset], ctx: &mut RunContext) -> Result<Results, ProcessorError>;
}
