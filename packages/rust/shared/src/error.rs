//! Error types for GuideConverter.
//!
//! Library crates use [`GuideConverterError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all GuideConverter operations.
#[derive(Debug, thiserror::Error)]
pub enum GuideConverterError {
    /// Configuration or substitution-table loading error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The remote resource does not exist (HTTP 404).
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Network/HTTP error while fetching a remote resource.
    #[error("network error: {0}")]
    Network(String),

    /// A classified line does not have the structure its rule expects.
    #[error("malformed directive: {message}")]
    MalformedDirective { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid input (empty guide name, bad URL, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, GuideConverterError>;

impl GuideConverterError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a malformed-directive error from any displayable message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDirective {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this is a fetch failure (missing resource or network problem).
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Network(_))
    }
}
