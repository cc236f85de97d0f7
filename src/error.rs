//! Error types for frame-forecast
//!
//! Library errors from Arrow, Parquet, `std::io` and `serde_json` are carried
//! through unchanged via `#[from]`.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// frame-forecast error types
#[derive(Error, Debug)]
pub enum Error {
    /// `accuracy` or `predict` called before the model was trained or loaded
    #[error("Model not trained: {0}")]
    ModelNotTrained(String),

    /// Row key could not be resolved (non-numeric or out of range)
    #[error("Key lookup failed: {0}")]
    KeyLookup(String),

    /// Column name not present in the table
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Value does not fit the column's type
    #[error("Type mismatch in column '{column}': expected {expected}, got {found}")]
    TypeMismatch {
        /// Column being written or read
        column: String,
        /// Column type
        expected: String,
        /// Offending value type
        found: String,
    },

    /// Invalid input data or configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Estimator parameter out of range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Not enough observations to fit the estimator
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Minimum number of observations
        required: usize,
        /// Observations supplied
        actual: usize,
    },

    /// Storage error (Parquet/Arrow conversion)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True for failures to resolve a row key or a column name.
    #[must_use]
    pub const fn is_lookup(&self) -> bool {
        matches!(self, Self::KeyLookup(_) | Self::ColumnNotFound(_))
    }
}
