//! Error types for format conversion.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while converting a document.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The source file was rejected before any backend call.
    #[error("{0}")]
    Validation(String),

    /// The whole conversion, retries included, ran past its budget.
    #[error("Conversion timed out after {0:?}. Please try again.")]
    Timeout(Duration),

    /// Network failure or server error (5xx); worth retrying.
    #[error("Conversion failed: {0}")]
    Transient(String),

    /// The backend refused the request (4xx); retrying will not help.
    #[error("Conversion failed: {0}")]
    Permanent(String),

    #[error("Conversion backend misconfigured: {0}")]
    Configuration(String),
}

/// Result type for conversion operations.
pub type ConversionResult<T> = Result<T, ConversionError>;

impl ConversionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether another attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
