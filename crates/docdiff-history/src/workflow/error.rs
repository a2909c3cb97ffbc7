//! Error types for publish runs.

use docdiff_confluence::ConfluenceError;
use docdiff_snapshot::SnapshotError;

/// Error during a publish run.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// A page the run depends on does not exist.
    #[error("missing page with title '{title}' in space {space}")]
    MissingPage {
        /// Space key.
        space: String,
        /// Expected page title.
        title: String,
    },

    /// Snapshot could not be read, written or built.
    #[error("{0}")]
    Snapshot(#[from] SnapshotError),

    /// Confluence API error.
    #[error("Confluence API error: {0}")]
    Confluence(#[from] ConfluenceError),
}
