//! Error types for audioleaf operations.
//!
//! `AudioleafError` covers the failures shared by every crate in the workspace
//! (configuration, document loading, I/O). Each pipeline crate layers its own
//! error enum on top; `EngineError` is the common currency external engines
//! report through the traits in [`crate::traits`].

use thiserror::Error;

/// Result type alias for audioleaf operations.
pub type AudioleafResult<T> = Result<T, AudioleafError>;

/// Main error type for shared audioleaf operations.
#[derive(Error, Debug)]
pub enum AudioleafError {
    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An external engine failed.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Configuration (CFG_xxx)
    CfgInvalidValue,
    CfgUnsupportedFormat,

    // Engine (ENG_xxx)
    EngUnavailable,
    EngFailed,

    // IO
    Io,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CfgInvalidValue => "CFG_001",
            ErrorCode::CfgUnsupportedFormat => "CFG_002",
            ErrorCode::EngUnavailable => "ENG_001",
            ErrorCode::EngFailed => "ENG_002",
            ErrorCode::Io => "IO_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AudioleafError {
    /// Create a validation error with an explicit code and suggestion.
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        code: ErrorCode,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code,
            suggestion: Some(suggestion.into()),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::Configuration(_) => ErrorCode::CfgInvalidValue,
            Self::Engine(EngineError::Unavailable(_)) => ErrorCode::EngUnavailable,
            Self::Engine(_) => ErrorCode::EngFailed,
            Self::Io(_) => ErrorCode::Io,
            Self::Serialization(_) => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Configuration(_) => Some("Please check your audioleaf configuration file"),
            Self::Engine(EngineError::Unavailable(_)) => {
                Some("Please check that the engine is installed and reachable")
            }
            _ => None,
        }
    }
}

/// Failure reported by an external engine (parser, render surface, OCR,
/// narration) through one of the collaborator traits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine is not installed, not loaded or already shut down.
    #[error("{0} is not available")]
    Unavailable(String),

    /// The engine cannot handle this kind of input.
    #[error("Unsupported input: {0}")]
    Unsupported(String),

    /// The engine ran and failed.
    #[error("{0}")]
    Failed(String),
}

impl EngineError {
    /// Create a failure from any displayable engine error.
    pub fn failed(message: impl std::fmt::Display) -> Self {
        Self::Failed(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ErrorCode::CfgInvalidValue.to_string(), "CFG_001");
        assert_eq!(ErrorCode::CfgUnsupportedFormat.as_str(), "CFG_002");
        assert_eq!(ErrorCode::Io.as_str(), "IO_001");
    }

    #[test]
    fn test_engine_error_maps_to_code() {
        let err: AudioleafError = EngineError::Unavailable("tesseract".into()).into();
        assert_eq!(err.code(), ErrorCode::EngUnavailable);
        assert!(err.suggestion().is_some());

        let err: AudioleafError = EngineError::failed("boom").into();
        assert_eq!(err.code(), ErrorCode::EngFailed);
        assert_eq!(err.to_string(), "Engine error: boom");
    }

    #[test]
    fn test_validation_with_suggestion() {
        let err = AudioleafError::validation_with_suggestion(
            "speech rate out of range",
            ErrorCode::CfgInvalidValue,
            "Use a rate between 0.5 and 2.0",
        );
        assert_eq!(err.code(), ErrorCode::CfgInvalidValue);
        assert_eq!(err.suggestion(), Some("Use a rate between 0.5 and 2.0"));
    }
}
