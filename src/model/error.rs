//! Error types for photosearch.
//!
//! Errors are defined with `thiserror` and compose via `?` and `From`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level binary error wrapping all startup and I/O failures
//!   - [`ConfigError`] - Config file read/parse failures, missing API key
//!   - [`LoggingError`] - Tracing subscriber setup failures
//!   - [`FetchError`] - A search page could not be fetched
//!   - `std::io::Error` - Reading commands from stdin, writing summaries
//!
//! # Fetch Failures
//!
//! [`FetchError`] is the only failure the search session ever sees. The
//! variants exist for the source implementation and for logging; the
//! session itself only keeps the `Display` text, which ends up in
//! `SearchUiState::error`. Fetch failures never escape the session.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use thiserror::Error;

/// Top-level application error.
///
/// Returned from the binary's startup path and the command loop. Fetch
/// errors only reach this type when the caller fetches outside a session.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or is incomplete.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// A fetch outside a session failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Reading commands or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A search page could not be fetched.
///
/// Search sources map every failure mode into one of these variants.
/// Callers that only need a message use `to_string()`.
///
/// # Examples
///
/// ```
/// use photosearch::model::FetchError;
///
/// let err = FetchError::Status { status: 503 };
/// assert_eq!(err.to_string(), "Search request returned HTTP 503");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("Network error: {0}")]
    Transport(String),

    /// The provider answered with a non-success HTTP status.
    #[error("Search request returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body was not the expected JSON shape.
    #[error("Malformed search response: {0}")]
    Decode(String),

    /// The provider reported a failure in its response envelope
    /// (`"stat": "fail"`), e.g. an invalid API key.
    #[error("Search provider error {code}: {message}")]
    Provider {
        /// Provider error code.
        code: i64,
        /// Provider error message.
        message: String,
    },
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}
