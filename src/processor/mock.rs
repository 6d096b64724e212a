//! Mock processor for testing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::RngCore;

use crate::core::{Arity, Dataset, InputRef};
use crate::results::{Results, Value};

use super::traits::{Processor, ProcessorError, RunContext};

/// Configuration for mock processor behaviour.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Name to register under
    pub name: String,
    /// Declared arity
    pub arity: Arity,
    /// Results to return
    pub results: Results,
    /// Number of PRNG draws appended to the results as `draws`
    pub draws: usize,
    /// Time to sleep before returning
    pub delay: Option<Duration>,
    /// Whether run should fail
    pub fails: bool,
}

impl MockConfig {
    /// Create a new mock config with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        MockConfig {
            name: name.into(),
            arity: Arity::VARIADIC,
            results: Results::new().with("mean", 0.0),
            draws: 0,
            delay: None,
            fails: false,
        }
    }

    /// Set the declared arity.
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Set the results to return.
    pub fn with_results(mut self, results: Results) -> Self {
        self.results = results;
        self
    }

    /// Draw `n` values from the run generator.
    pub fn with_draws(mut self, n: usize) -> Self {
        self.draws = n;
        self
    }

    /// Sleep for `delay` inside run.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make run fail.
    pub fn fails(mut self) -> Self {
        self.fails = true;
        self
    }
}

/// Mock processor that returns configured results.
///
/// Records the input references of every call it receives.
pub struct MockProcessor {
    config: MockConfig,
    calls: Arc<Mutex<Vec<Vec<InputRef>>>>,
}

impl MockProcessor {
    pub fn new(config: MockConfig) -> Self {
        MockProcessor {
            config,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle on the recorded calls.
    pub fn calls(&self) -> Arc<Mutex<Vec<Vec<InputRef>>>> {
        Arc::clone(&self.calls)
    }
}

impl Processor for MockProcessor {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn arity(&self) -> Arity {
        self.config.arity
    }

    fn run(&self, datasets: &[Dataset], ctx: &mut RunContext) -> Result<Results, ProcessorError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(datasets.iter().map(|d| d.reference().clone()).collect());
        }
        if let Some(delay) = self.config.delay {
            std::thread::sleep(delay);
        }
        if self.config.fails {
            return Err(ProcessorError::Failed("mock run failed".into()));
        }

        let mut results = self.config.results.clone();
        if self.config.draws > 0 {
            let draws: Vec<Value> = (0..self.config.draws)
                .map(|_| Value::Int((ctx.rng().next_u64() >> 1) as i64))
                .collect();
            results.push("draws", Value::List(draws));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::traits::CancelToken;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn ctx(seed: u64) -> RunContext {
        RunContext::new(StdRng::seed_from_u64(seed), CancelToken::new())
    }

    #[test]
    fn test_mock_processor_default() {
        let processor = MockProcessor::new(MockConfig::new("mock"));
        let results = processor.run(&[], &mut ctx(0)).unwrap();
        assert_eq!(results, Results::new().with("mean", 0.0));
        assert_eq!(processor.arity(), Arity::VARIADIC);
    }

    #[test]
    fn test_mock_processor_records_calls() {
        let processor = MockProcessor::new(MockConfig::new("mock"));
        let datasets = vec![
            Dataset::new(InputRef::new("srs", "1"), json!([])),
            Dataset::new(InputRef::new("srs", "0"), json!([])),
        ];
        processor.run(&datasets, &mut ctx(0)).unwrap();

        let calls = processor.calls();
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec![InputRef::new("srs", "1"), InputRef::new("srs", "0")]);
    }

    #[test]
    fn test_mock_processor_fails() {
        let processor = MockProcessor::new(MockConfig::new("mock").fails());
        assert!(processor.run(&[], &mut ctx(0)).is_err());
    }

    #[test]
    fn test_mock_processor_draws_follow_seed() {
        let processor = MockProcessor::new(MockConfig::new("mock").with_draws(3));
        let a = processor.run(&[], &mut ctx(9)).unwrap();
        let b = processor.run(&[], &mut ctx(9)).unwrap();
        let c = processor.run(&[], &mut ctx(10)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
