//! Error types for the EdAPT session core.
//!
//! This module defines the error hierarchy for all session operations,
//! including configuration loading, durable store access, and calls to
//! the external generation service.

use std::path::PathBuf;

/// A specialized `Result` type for EdAPT session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur while serving a learning session.
///
/// Error variants are organized by subsystem and include actionable
/// suggestions where possible to help users resolve issues.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your edapt.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Durable Store Errors
    // ========================================================================
    /// Failed to read a durable record from disk.
    #[error("Failed to read '{path}': {message}\n\nSuggestion: Check that the data directory exists and is readable")]
    StoreReadError {
        /// Path of the record that could not be read.
        path: PathBuf,
        /// Description of the read failure.
        message: String,
    },

    /// Failed to write a durable record to disk.
    #[error("Failed to write '{path}': {message}\n\nSuggestion: Check write permissions and available disk space")]
    StoreWriteError {
        /// Path of the record that could not be written.
        path: PathBuf,
        /// Description of the write failure.
        message: String,
    },

    // ========================================================================
    // Generation Service Errors
    // ========================================================================
    /// The external generation service reported or caused an error.
    #[error("Generation error ({kind}): {message}\n\nSuggestion: {suggestion}")]
    GenerationError {
        /// The kind of generation error (e.g., unavailable, network, server).
        kind: GenerationErrorKind,
        /// Detailed error message.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Categories of generation service errors for structured error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    /// The service cannot be reached at all (not running, wrong endpoint).
    Unavailable,
    /// Network connectivity issues mid-request.
    Network,
    /// Server error (5xx responses).
    Server,
    /// The model produced output the caller could not use.
    Malformed,
    /// Other unclassified errors.
    Other,
}

impl std::fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "unavailable"),
            Self::Network => write!(f, "network"),
            Self::Server => write!(f, "server"),
            Self::Malformed => write!(f, "malformed"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl GenerationErrorKind {
    /// Returns a suggestion message for this error kind.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::Unavailable => {
                "Make sure the model runtime is running (try 'ollama serve') and the endpoint in edapt.json is correct"
            }
            Self::Network => "Check your network connection to the model runtime",
            Self::Server => "Retry later; the model runtime may be overloaded",
            Self::Malformed => "Retry the request; model output varies between runs",
            Self::Other => "Check the model runtime logs for details",
        }
    }
}

impl SessionError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `StoreReadError` with the given path and message.
    #[must_use]
    pub fn store_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StoreReadError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `StoreWriteError` with the given path and message.
    #[must_use]
    pub fn store_write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StoreWriteError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `GenerationError` with automatic suggestion based on kind.
    #[must_use]
    pub fn generation(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        let suggestion = kind.suggestion().to_string();
        Self::GenerationError {
            kind,
            message: message.into(),
            suggestion,
        }
    }

    /// Returns `true` if this error is transient and the action may be retried.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::GenerationError {
                kind: GenerationErrorKind::Network
                    | GenerationErrorKind::Server
                    | GenerationErrorKind::Malformed,
                ..
            }
        )
    }

    /// Returns `true` if this error came from the generation service.
    ///
    /// Generation failures are surfaced to the user as a recoverable notice
    /// rather than aborting the session.
    #[must_use]
    pub const fn is_generation(&self) -> bool {
        matches!(self, Self::GenerationError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = SessionError::store_write("/data/student_profile.json", "disk full");
        let msg = err.to_string();
        assert!(msg.contains("Failed to write"));
        assert!(msg.contains("/data/student_profile.json"));
        assert!(msg.contains("Suggestion"));
    }

    #[test]
    fn test_generation_error_kind_display() {
        assert_eq!(GenerationErrorKind::Unavailable.to_string(), "unavailable");
        assert_eq!(GenerationErrorKind::Malformed.to_string(), "malformed");
    }

    #[test]
    fn test_is_transient() {
        let server = SessionError::generation(GenerationErrorKind::Server, "502 from runtime");
        assert!(server.is_transient());

        let unavailable =
            SessionError::generation(GenerationErrorKind::Unavailable, "connection refused");
        assert!(!unavailable.is_transient());

        let config = SessionError::config_validation("bad", "fix it");
        assert!(!config.is_transient());
    }

    #[test]
    fn test_is_generation() {
        let gen_err = SessionError::generation(GenerationErrorKind::Other, "oops");
        assert!(gen_err.is_generation());

        let io_err: SessionError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(!io_err.is_generation());
    }

    #[test]
    fn test_generation_suggestion_filled_in() {
        let err = SessionError::generation(GenerationErrorKind::Unavailable, "refused");
        let msg = err.to_string();
        assert!(msg.contains("ollama serve"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let session_err: SessionError = io_err.into();
        assert!(matches!(session_err, SessionError::Io(_)));
    }
}
