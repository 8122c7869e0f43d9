//! Error types for pricefit.

use thiserror::Error;

/// Result type for pricefit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pricefit operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The bound predictor failed or produced an unusable value.
    #[error("Predictor '{name}' failed: {msg}")]
    Predictor { name: String, msg: String },

    /// Requested index (or sample size) lies outside the dataset.
    #[error("Index out of range: {index} (limit {limit})")]
    IndexOutOfRange { index: usize, limit: usize },

    /// Items must be evaluated in dataset order, each exactly once.
    #[error("Out of order evaluation: expected item {expected}, got {got}")]
    OutOfOrder { expected: usize, got: usize },

    /// The evaluator has already produced its report.
    #[error("Evaluator has already reported; no further evaluation permitted")]
    AlreadyReported,

    /// A report was requested before every item was evaluated.
    #[error("Evaluation incomplete: {done} of {size} items evaluated")]
    Incomplete { done: usize, size: usize },

    /// Dataset loading/parsing error.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Missing or invalid configuration (API keys, endpoints).
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create a predictor failure.
    pub fn predictor(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::Predictor {
            name: name.into(),
            msg: msg.into(),
        }
    }

    /// Create a dataset error.
    pub fn dataset(msg: impl Into<String>) -> Self {
        Error::Dataset(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
