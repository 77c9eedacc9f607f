//! Error types for reconciliation operations.

use thiserror::Error;

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, ReconError>;

/// Errors that can occur during reconciliation and export.
#[derive(Debug, Error)]
pub enum ReconError {
    /// CSV serialization error
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested export format does not apply to the data shape
    #[error("Invalid export format: {0}")]
    InvalidFormat(String),
}
