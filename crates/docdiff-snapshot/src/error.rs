//! Error types for snapshot operations.

use std::path::PathBuf;

/// Error from reading, writing or building a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Snapshot file does not exist.
    #[error("snapshot not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Snapshot file exists and must not be overwritten.
    #[error("snapshot already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Snapshot file could not be parsed into entries.
    #[error("malformed snapshot {}: {source}", path.display())]
    Format {
        /// Snapshot file path.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// Two entries share the same id.
    #[error("duplicate content id '{id}' in snapshot")]
    DuplicateId {
        /// The colliding id.
        id: String,
    },

    /// I/O error on the snapshot file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Snapshot file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
