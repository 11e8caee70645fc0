//! Error types for the composition-profiler library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum ProfilerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Shape mismatch: expected {expected} columns, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Symbol '{0}' is not part of the alphabet")]
    InvalidSymbol(char),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, ProfilerError>;
