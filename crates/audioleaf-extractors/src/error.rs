//! Extraction error types.

use std::time::Duration;
use thiserror::Error;

use audioleaf_core::EngineError;

/// Errors that can occur during document extraction.
///
/// Only the document-level variants ever leave [`crate::Orchestrator`];
/// the rest are produced inside strategies and either degrade to
/// diagnostic page text or are logged before the chain moves on.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Document exceeds the configured size limit.
    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    Oversize { size: u64, limit: u64 },

    /// Payload does not match its declared type, or the type is unsupported.
    #[error("Invalid document format: {0}")]
    InvalidFormat(String),

    /// Every strategy produced empty text.
    #[error("No readable content found in {0}")]
    NoContent(String),

    /// A document-level step exceeded its budget.
    #[error("{step} timed out after {elapsed:?}")]
    Timeout { step: String, elapsed: Duration },

    /// PDF structure could not be read.
    #[error("PDF extraction error: {0}")]
    Parse(String),

    /// DOCX-specific extraction error.
    #[error("DOCX extraction error: {0}")]
    Docx(String),

    /// An external engine failed.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Task join error from spawn_blocking.
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// IO error during extraction.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Public failure taxonomy presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    EngineUnavailable,
    Timeout,
    NoContent,
}

impl ExtractError {
    pub fn timeout(step: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            step: step.into(),
            elapsed,
        }
    }

    /// Map to the public failure taxonomy.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Oversize { .. } | Self::InvalidFormat(_) => ErrorClass::Validation,
            Self::NoContent(_) => ErrorClass::NoContent,
            Self::Timeout { .. } => ErrorClass::Timeout,
            Self::Parse(_)
            | Self::Docx(_)
            | Self::Engine(_)
            | Self::TaskJoin(_)
            | Self::Io(_) => ErrorClass::EngineUnavailable,
        }
    }

    /// Whether this failure ends the whole extraction rather than one strategy.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Oversize { .. } | Self::InvalidFormat(_) | Self::Timeout { .. }
        )
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Oversize { limit, .. } => format!(
                "File size too large. Please select a file smaller than {}MB.",
                limit / (1024 * 1024)
            ),
            Self::InvalidFormat(detail) => format!(
                "Invalid file format: {detail}. Please select a valid PDF or Word document."
            ),
            Self::NoContent(_) => "No text content found in the document. The file might be \
                                   image-based or corrupted."
                .to_string(),
            Self::Timeout { .. } => {
                "Processing took too long and was stopped. Please try a smaller document."
                    .to_string()
            }
            other => format!("Error processing document: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let oversize = ExtractError::Oversize {
            size: 60,
            limit: 50,
        };
        assert_eq!(oversize.class(), ErrorClass::Validation);
        assert!(oversize.is_fatal());

        let timeout = ExtractError::timeout("parse", Duration::from_secs(60));
        assert_eq!(timeout.class(), ErrorClass::Timeout);
        assert!(timeout.is_fatal());

        let engine = ExtractError::from(EngineError::Unavailable("tesseract".into()));
        assert_eq!(engine.class(), ErrorClass::EngineUnavailable);
        assert!(!engine.is_fatal());

        assert_eq!(
            ExtractError::NoContent("a.pdf".into()).class(),
            ErrorClass::NoContent
        );
    }

    #[test]
    fn test_user_messages() {
        let msg = ExtractError::InvalidFormat("missing %PDF header".into()).user_message();
        assert!(msg.contains("missing %PDF header"));
        let oversize = ExtractError::Oversize {
            size: 60 * 1024 * 1024,
            limit: 50 * 1024 * 1024,
        };
        assert!(oversize.user_message().contains("50MB"));
    }
}
