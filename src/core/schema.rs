//! Request and run metadata schema.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::results::Results;
use crate::{MungeError, MungeResult};

/// Schema version of persisted run records
pub const SCHEMA_VERSION: u32 = 1;

/// Reference to one previously collected dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputRef {
    pub collector: String,
    pub key: String,
}

impl InputRef {
    pub fn new(collector: impl Into<String>, key: impl Into<String>) -> Self {
        InputRef {
            collector: collector.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for InputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.collector, self.key)
    }
}

/// Pair a flat `collector key collector key ...` token list into references.
///
/// An odd number of tokens is rejected with `UnpairedInputs`.
pub fn pair_tokens<S: AsRef<str>>(tokens: &[S]) -> MungeResult<Vec<InputRef>> {
    if tokens.len() % 2 != 0 {
        return Err(MungeError::UnpairedInputs(tokens.len()));
    }
    Ok(tokens
        .chunks_exact(2)
        .map(|pair| InputRef::new(pair[0].as_ref(), pair[1].as_ref()))
        .collect())
}

/// Parse a seed given as any 64-bit integer.
///
/// Negative values are reinterpreted as their two's-complement `u64`, so
/// `-1` and `18446744073709551615` select the same generator.
pub fn parse_seed(text: &str) -> Result<u64, String> {
    let text = text.trim();
    text.parse::<u64>()
        .or_else(|_| text.parse::<i64>().map(|v| v as u64))
        .map_err(|_| format!("invalid seed '{text}': expected an integer"))
}

/// Number of inputs a processor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    /// Variadic processors take at least one input.
    pub const VARIADIC: Arity = Arity::AtLeast(1);

    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// A validated request to run one processor.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    /// Registered processor name
    pub processor: String,
    /// Ordered input references, already paired
    pub inputs: Vec<InputRef>,
    /// Fixed seed for the run generator
    pub seed: Option<u64>,
    /// 0 = condensed, 1 = expanded, 4+ = debugging info
    pub verbosity: u8,
    /// Digits after the decimal point for floats
    pub precision: Option<usize>,
}

impl ExecutionRequest {
    /// Create a request with default verbosity and no seed.
    pub fn new(processor: impl Into<String>, inputs: Vec<InputRef>) -> Self {
        ExecutionRequest {
            processor: processor.into(),
            inputs,
            seed: None,
            verbosity: 1,
            precision: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }
}

/// Metadata describing one processor run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionInfo {
    /// Wall-clock date at which the processor was invoked
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub processor: String,
    pub input: Vec<InputRef>,
    /// Duration of the processor invocation only
    pub time: Duration,
    /// Seed actually applied to the run generator
    pub prngs_seed: Option<u64>,
}

/// Persisted form of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub schema_version: u32,
    pub record_id: String,
    pub info: ExecutionInfo,
    /// SHA-256 of each input payload, in input order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fingerprints: Vec<String>,
    pub results: Results,
}

impl RunRecord {
    pub fn new(info: ExecutionInfo, fingerprints: Vec<String>, results: Results) -> Self {
        let nanos = info.date.unix_timestamp_nanos();
        let record_id = format!("{:x}-{}", nanos, info.processor);
        RunRecord {
            schema_version: SCHEMA_VERSION,
            record_id,
            info,
            fingerprints,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_tokens_preserves_order() {
        let refs = pair_tokens(&["srs", "0", "srs", "1", "web", "a"]).unwrap();
        assert_eq!(
            refs,
            vec![
                InputRef::new("srs", "0"),
                InputRef::new("srs", "1"),
                InputRef::new("web", "a"),
            ]
        );
    }

    #[test]
    fn test_pair_tokens_rejects_odd_count() {
        let err = pair_tokens(&["srs", "0", "srs"]).unwrap_err();
        assert!(matches!(err, MungeError::UnpairedInputs(3)));
    }

    #[test]
    fn test_parse_seed_accepts_signed_and_unsigned() {
        assert_eq!(parse_seed("42"), Ok(42));
        assert_eq!(parse_seed("-1"), Ok(u64::MAX));
        assert_eq!(parse_seed("18446744073709551615"), Ok(u64::MAX));
        assert_eq!(parse_seed("-9223372036854775808"), Ok(1 << 63));
        assert!(parse_seed("1.5").is_err());
        assert!(parse_seed("-18446744073709551615").is_err());
    }

    #[test]
    fn test_arity_accepts() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(1));
        assert!(!Arity::Exact(2).accepts(3));
        assert!(Arity::VARIADIC.accepts(1));
        assert!(Arity::VARIADIC.accepts(7));
        assert!(!Arity::VARIADIC.accepts(0));
    }

    #[test]
    fn test_input_ref_display() {
        assert_eq!(InputRef::new("srs", "3").to_string(), "srs_3");
    }

    #[test]
    fn test_execution_info_serializes_rfc3339_date() {
        let info = ExecutionInfo {
            date: OffsetDateTime::UNIX_EPOCH,
            processor: "stats".to_string(),
            input: vec![InputRef::new("srs", "0")],
            time: Duration::from_millis(5),
            prngs_seed: Some(42),
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("1970-01-01T00:00:00Z"), "got {json}");

        let back: ExecutionInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }
}
