//! Execution coordinator.
//!
//! Runs one `ExecutionRequest` through the fixed stage order:
//! lookup -> arity check -> resolution -> seeding -> timed invocation.
//! Nothing is seeded or resolved for a request that fails an earlier stage.

use std::time::Instant;

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::collector::InputResolver;
use crate::core::{Dataset, ExecutionInfo, ExecutionRequest, RunRecord};
use crate::processor::{CancelToken, ProcessorRegistry, RunContext};
use crate::results::Results;
use crate::{MungeError, MungeResult};

use super::prng::PrngManager;

/// Outcome of a successful execution.
#[derive(Debug, Clone)]
pub struct Execution {
    pub results: Results,
    pub info: ExecutionInfo,
    /// SHA-256 of each resolved input payload, in input order
    pub fingerprints: Vec<String>,
}

impl Execution {
    pub fn into_parts(self) -> (Results, ExecutionInfo) {
        (self.results, self.info)
    }

    /// Persistable record of this run.
    pub fn record(&self) -> RunRecord {
        RunRecord::new(
            self.info.clone(),
            self.fingerprints.clone(),
            self.results.clone(),
        )
    }
}

/// Coordinates registry, resolver and PRNG for each request.
pub struct Engine {
    registry: ProcessorRegistry,
    resolver: InputResolver,
    prng: PrngManager,
}

impl Engine {
    pub fn new(registry: ProcessorRegistry, resolver: InputResolver) -> Self {
        Engine {
            registry,
            resolver,
            prng: PrngManager::default(),
        }
    }

    /// Replace the PRNG manager (e.g., to change the seed policy).
    pub fn with_prng(mut self, prng: PrngManager) -> Self {
        self.prng = prng;
        self
    }

    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &InputResolver {
        &self.resolver
    }

    pub fn prng(&self) -> &PrngManager {
        &self.prng
    }

    /// Run a request to completion and return its results and metadata.
    pub fn execute(&self, request: &ExecutionRequest) -> MungeResult<(Results, ExecutionInfo)> {
        self.execute_with_cancel(request, &CancelToken::new())
            .map(Execution::into_parts)
    }

    /// Run a request, letting the host stop it through `cancel`.
    ///
    /// Cancellation is cooperative: it takes effect at the processor's next
    /// `RunContext::checkpoint` and surfaces as `ProcessorExecution`.
    pub fn execute_with_cancel(
        &self,
        request: &ExecutionRequest,
        cancel: &CancelToken,
    ) -> MungeResult<Execution> {
        let processor = self.registry.lookup(&request.processor)?;

        let expected = processor.arity();
        if !expected.accepts(request.inputs.len()) {
            return Err(MungeError::ArityMismatch {
                processor: request.processor.clone(),
                expected,
                got: request.inputs.len(),
            });
        }

        let datasets = self.resolver.resolve(&request.inputs)?;
        let fingerprints = datasets
            .iter()
            .map(Dataset::fingerprint)
            .collect::<MungeResult<Vec<_>>>()?;

        let seeded = self.prng.seed(request.seed);
        let mut ctx = RunContext::new(seeded.rng, cancel.clone());

        info!(
            processor = %request.processor,
            inputs = request.inputs.len(),
            seed = ?seeded.effective_seed,
            "running processor"
        );
        let date = OffsetDateTime::now_utc();
        let start = Instant::now();
        let outcome = processor.run(&datasets, &mut ctx);
        let elapsed = start.elapsed();

        let info = ExecutionInfo {
            date,
            processor: request.processor.clone(),
            input: request.inputs.clone(),
            time: elapsed,
            prngs_seed: seeded.effective_seed,
        };

        match outcome {
            Ok(results) => {
                debug!(elapsed = ?elapsed, entries = results.len(), "processor finished");
                Ok(Execution {
                    results,
                    info,
                    fingerprints,
                })
            }
            Err(source) => {
                warn!(processor = %request.processor, error = %source, "processor failed");
                Err(MungeError::ProcessorExecution {
                    info: Box::new(info),
                    source,
                })
            }
        }
    }
}
