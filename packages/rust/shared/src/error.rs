//! Error types for MacroFind.
//!
//! Library crates use [`MacroFindError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all MacroFind operations.
#[derive(Debug, thiserror::Error)]
pub enum MacroFindError {
    /// Month outside 1–12 when deriving queries.
    #[error("invalid date: {year}-{month} (month must be 1-12)")]
    InvalidDate { year: i32, month: i32 },

    /// A search result URL that cannot be parsed into a host.
    #[error("malformed URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    /// The search collaborator failed or timed out for one query.
    #[error("search unavailable for query '{query}': {message}")]
    SearchUnavailable { query: String, message: String },

    /// The findings document is missing, unreadable, or not valid JSON.
    #[error("cannot read findings document {path:?}: {message}")]
    DocumentRead { path: PathBuf, message: String },

    /// The findings document could not be written back.
    #[error("cannot write findings document {path:?}: {message}")]
    DocumentWrite { path: PathBuf, message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MacroFindError>;

impl MacroFindError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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

    pub fn malformed_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn search_unavailable(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SearchUnavailable {
            query: query.into(),
            message: message.into(),
        }
    }

    pub fn document_read(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::DocumentRead {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn document_write(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::DocumentWrite {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error only affects a single query or result and the run
    /// should continue.
    pub fn is_isolated(&self) -> bool {
        matches!(
            self,
            Self::MalformedUrl { .. } | Self::SearchUnavailable { .. }
        )
    }
}
