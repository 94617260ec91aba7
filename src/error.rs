//! Error types for the benchmark harness

use thiserror::Error;

/// Errors raised while configuring or running the benchmark matrix
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("unknown list kind: {0} (expected ArrayList, LinkedList or Vector)")]
    UnknownListKind(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("unknown lookup mode: {0} (expected positional or direct)")]
    UnknownLookupMode(String),

    #[error("unknown time unit: {0} (expected ns, us, ms or s)")]
    UnknownTimeUnit(String),

    /// Invalid axes or protocol settings
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// An operation computed something other than the sum of 0..N
    #[error("{operation} on {kind} with {elements} elements returned {actual}, expected {expected}")]
    OracleMismatch {
        operation: String,
        kind: String,
        elements: usize,
        expected: i64,
        actual: i64,
    },

    /// Forked worker failed or produced malformed output
    #[error("forked trial failed: {0}")]
    Fork(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type BenchResult<T> = Result<T, BenchError>;
