//! Error types for vendor data operations.

use thiserror::Error;

/// Result type for vendor data operations.
pub type Result<T> = std::result::Result<T, VendorError>;

/// Errors that can occur while handling scraped vendor financials.
#[derive(Debug, Error)]
pub enum VendorError {
    /// Non-empty value that is neither a placeholder nor parseable by the
    /// scraped numeric grammar
    #[error("Malformed numeric value: {0}")]
    MalformedNumber(String),

    /// Period label that does not follow the `Mon YYYY (FQn)` grammar
    #[error("Malformed period label: {0}")]
    MalformedPeriodLabel(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
