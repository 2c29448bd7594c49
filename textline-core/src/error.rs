//! Error types for textline connectors

use std::io;
use thiserror::Error;

/// Result type for textline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for textline operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error raised by the underlying file primitives, surfaced unchanged
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Schema does not satisfy the connector's contract
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Operation not supported on this path
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid operation for the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Bad configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Binary serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Text is not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
