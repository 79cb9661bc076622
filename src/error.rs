//! Error types for kvbench
//!
//! Provides a unified error type for the codec, the connection and the
//! benchmark driver.

use thiserror::Error;

/// Result type alias using BenchError
pub type Result<T> = std::result::Result<T, BenchError>;

/// Unified error type for kvbench operations
#[derive(Debug, Error)]
pub enum BenchError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Wire Errors
    // -------------------------------------------------------------------------
    /// Malformed or truncated response framing
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Read failure on the underlying connection
    #[error("Transport error: {0}")]
    Transport(String),

    // -------------------------------------------------------------------------
    // Benchmark Errors
    // -------------------------------------------------------------------------
    /// A GET returned a value other than the one the worker wrote for that key
    #[error("kv not match: key={key}, expected={expected}, actual={actual}")]
    ConsistencyViolation {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Worker {0} exited without reporting a result")]
    WorkerLost(usize),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Unsupported client type: {0}")]
    UnsupportedClient(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
