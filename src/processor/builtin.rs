//! Built-in processors over numeric samples.
//!
//! Dataset payloads are read as numeric samples: a JSON array of numbers, an
//! object with a `samples` or `values` array, a single number, or an array of
//! row objects (as produced for CSV files) whose numeric cells are taken.

use rand::Rng;
use serde_json::Value as JsonValue;

use crate::core::{Arity, Dataset};
use crate::results::{Results, Value};

use super::traits::{Processor, ProcessorError, RunContext};

/// Extract numeric samples from a dataset payload.
pub fn samples(index: usize, dataset: &Dataset) -> Result<Vec<f64>, ProcessorError> {
    let mut out = Vec::new();
    collect_samples(dataset.payload(), &mut out)
        .map_err(|reason| ProcessorError::invalid(index, dataset, reason))?;
    Ok(out)
}

fn collect_samples(payload: &JsonValue, out: &mut Vec<f64>) -> Result<(), String> {
    match payload {
        JsonValue::Number(n) => {
            out.push(n.as_f64().ok_or("number out of range")?);
            Ok(())
        }
        JsonValue::Array(items) => {
            for item in items {
                match item {
                    JsonValue::Number(_) => collect_samples(item, out)?,
                    JsonValue::Object(row) => {
                        out.extend(row.values().filter_map(|v| v.as_f64()));
                    }
                    other => return Err(format!("unexpected array element: {other}")),
                }
            }
            Ok(())
        }
        JsonValue::Object(map) => match map.get("samples").or_else(|| map.get("values")) {
            Some(inner @ JsonValue::Array(_)) => collect_samples(inner, out),
            _ => Err("object has no 'samples' or 'values' array".to_string()),
        },
        other => Err(format!("not numeric data: {other}")),
    }
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn stddev(xs: &[f64], mean: f64) -> f64 {
    let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / xs.len() as f64;
    var.sqrt()
}

/// Pool the samples of all inputs, keeping per-input counts.
fn pooled(datasets: &[Dataset]) -> Result<(Vec<f64>, Vec<usize>), ProcessorError> {
    let mut all = Vec::new();
    let mut counts = Vec::with_capacity(datasets.len());
    for (i, dataset) in datasets.iter().enumerate() {
        let xs = samples(i, dataset)?;
        counts.push(xs.len());
        all.extend(xs);
    }
    if all.is_empty() {
        return Err(ProcessorError::Failed("no numeric samples in input".into()));
    }
    Ok((all, counts))
}

/// Summary statistics over the pooled samples of all inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats;

impl Processor for Stats {
    fn name(&self) -> &str {
        "stats"
    }

    fn description(&self) -> &str {
        "count, mean, standard deviation and range of pooled samples"
    }

    fn run(&self, datasets: &[Dataset], _ctx: &mut RunContext) -> Result<Results, ProcessorError> {
        let (xs, counts) = pooled(datasets)?;
        let mean = mean(&xs);
        let min = xs.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        Ok(Results::new()
            .with("count", xs.len())
            .with("mean", mean)
            .with("std", stddev(&xs, mean))
            .with("min", min)
            .with("max", max)
            .with_debug("per_input", counts))
    }
}

/// Percentile bootstrap confidence interval of the mean.
#[derive(Debug, Clone, Copy)]
pub struct Bootstrap {
    pub resamples: usize,
    pub confidence: f64,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Bootstrap {
            resamples: 1000,
            confidence: 0.95,
        }
    }
}

impl Processor for Bootstrap {
    fn name(&self) -> &str {
        "bootstrap"
    }

    fn description(&self) -> &str {
        "bootstrap confidence interval of the mean (uses the PRNG)"
    }

    fn run(&self, datasets: &[Dataset], ctx: &mut RunContext) -> Result<Results, ProcessorError> {
        if self.resamples == 0 {
            return Err(ProcessorError::Failed("resamples must be at least 1".into()));
        }
        let (xs, _) = pooled(datasets)?;
        let n = xs.len();
        let point = mean(&xs);

        let mut means = Vec::with_capacity(self.resamples);
        let mut resample = vec![0.0; n];
        for b in 0..self.resamples {
            if b % 256 == 0 {
                ctx.checkpoint()?;
            }
            let rng = ctx.rng();
            for slot in resample.iter_mut() {
                *slot = xs[rng.random_range(0..n)];
            }
            means.push(mean(&resample));
        }
        means.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let alpha = (1.0 - self.confidence) / 2.0;
        let last = means.len() - 1;
        let lower_idx = ((alpha * means.len() as f64).floor() as usize).min(last);
        let upper_idx = (((1.0 - alpha) * means.len() as f64).ceil() as usize)
            .saturating_sub(1)
            .min(last);
        let standard_error = stddev(&means, mean(&means));

        Ok(Results::new()
            .with("mean", point)
            .with("ci_lower", means[lower_idx])
            .with("ci_upper", means[upper_idx])
            .with("confidence", self.confidence)
            .with_debug("resamples", self.resamples)
            .with_debug("standard_error", standard_error))
    }
}

/// Difference between the means of exactly two inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Diff;

impl Processor for Diff {
    fn name(&self) -> &str {
        "diff"
    }

    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn description(&self) -> &str {
        "difference of means, second input minus first"
    }

    fn run(&self, datasets: &[Dataset], _ctx: &mut RunContext) -> Result<Results, ProcessorError> {
        let mut means = Vec::with_capacity(2);
        let mut counts = Vec::with_capacity(2);
        for (i, dataset) in datasets.iter().enumerate() {
            let xs = samples(i, dataset)?;
            if xs.is_empty() {
                return Err(ProcessorError::invalid(i, dataset, "no numeric samples"));
            }
            counts.push(Value::from(xs.len()));
            means.push(mean(&xs));
        }
        let (a, b) = (means[0], means[1]);

        Ok(Results::new()
            .with("first", a)
            .with("second", b)
            .with("difference", b - a)
            .with_debug("counts", Value::List(counts)))
    }
}
