pub mod collector;
pub mod config;
pub mod core;
pub mod engine;
pub mod processor;
pub mod report;
pub mod results;
pub mod storage;

use thiserror::Error;

use crate::core::{Arity, ExecutionInfo, InputRef};
use crate::processor::ProcessorError;

#[derive(Debug, Error)]
pub enum MungeError {
    #[error("unknown collector '{}' (requested {})", .0.collector, .0)]
    UnknownCollector(InputRef),
    #[error("no data under key '{}' in collector '{}'", .0.key, .0.collector)]
    MissingKey(InputRef),
    #[error("collector '{0}' is already registered")]
    DuplicateCollector(String),
    #[error("unknown processor '{0}'")]
    UnknownProcessor(String),
    #[error("processor '{0}' is already registered")]
    DuplicateProcessor(String),
    #[error("processor '{processor}' expects {expected} input(s), got {got}")]
    ArityMismatch {
        processor: String,
        expected: Arity,
        got: usize,
    },
    #[error("processor '{}' failed after {:?}: {}", .info.processor, .info.time, .source)]
    ProcessorExecution {
        info: Box<ExecutionInfo>,
        #[source]
        source: ProcessorError,
    },
    #[error("cannot render result at '{path}': {reason}")]
    UnrenderableResult { path: String, reason: String },
    #[error("please give a list of (collector, data key) pairs, got {0} token(s)")]
    UnpairedInputs(usize),
    #[error("config error: {0}")]
    Config(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type MungeResult<T> = Result<T, MungeError>;

pub use crate::collector::{Collector, InputResolver};
pub use crate::engine::{Engine, PrngManager};
pub use crate::processor::{Processor, ProcessorRegistry};
pub use crate::results::{Entry, Results, Value};

pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha256::digest;
    digest(bytes)
}
