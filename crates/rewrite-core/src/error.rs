//! Error types for model rewriting.
//!
//! The `Rewriter` contract itself only speaks in booleans. These errors are
//! used by the fallible helpers behind each rewriter step, which log and
//! collapse them before returning across the contract boundary.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::ModelType;

/// Main error type for rewrite internals.
#[derive(Debug, Error)]
pub enum RewriteError {
    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Conversion errors
    #[error("Conversion failed: {message}")]
    Conversion { message: String },

    #[error("Unsupported model type: expected {expected}, got {actual}")]
    UnsupportedModelType {
        expected: ModelType,
        actual: ModelType,
    },

    // Configuration errors
    #[error("Invalid rewriter configuration: {message}")]
    InvalidConfig { message: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for rewrite operations.
pub type Result<T> = std::result::Result<T, RewriteError>;

impl From<std::io::Error> for RewriteError {
    fn from(err: std::io::Error) -> Self {
        RewriteError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for RewriteError {
    fn from(err: serde_json::Error) -> Self {
        RewriteError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl RewriteError {
    /// Create an IO error with a short description of what was being done.
    pub fn io(context: &str, path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        RewriteError::Io {
            message: format!("{context}: {err}"),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Shorthand for a conversion failure.
    pub fn conversion(message: impl Into<String>) -> Self {
        RewriteError::Conversion {
            message: message.into(),
        }
    }
}
