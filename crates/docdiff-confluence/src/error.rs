//! Error types for Confluence integration.

use std::path::PathBuf;

/// Error from Confluence API operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// More than one page carries the same title in a space.
    #[error("{count} pages titled '{title}' in space {space}, expected at most one")]
    AmbiguousTitle {
        /// Space key.
        space: String,
        /// Page title.
        title: String,
        /// Number of matching pages.
        count: usize,
    },

    /// Download destination already exists.
    #[error("refusing to overwrite existing file: {}", .0.display())]
    LocalConflict(PathBuf),

    /// Server answered with a body of an unexpected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
