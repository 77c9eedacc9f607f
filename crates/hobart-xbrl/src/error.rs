//! Error types for XBRL operations.

use thiserror::Error;

/// Result type for XBRL operations.
pub type Result<T> = std::result::Result<T, XbrlError>;

/// Errors that can occur while parsing XBRL instance documents.
#[derive(Debug, Error)]
pub enum XbrlError {
    /// XML syntax or encoding error
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// Date value that does not follow the YYYY-MM-DD grammar
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Non-empty value that is neither a placeholder nor a parseable number
    #[error("Malformed numeric value: {0}")]
    MalformedNumber(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
