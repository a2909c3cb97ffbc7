//! Result types for publish runs.

use std::path::PathBuf;

use docdiff_snapshot::DiffCounts;

/// What happened to the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotStatus {
    /// A snapshot was already persisted; the space was not listed.
    Existing(PathBuf),
    /// The space was listed and the snapshot written.
    Written {
        /// Snapshot file.
        path: PathBuf,
        /// Number of entries captured.
        entries: usize,
    },
    /// The space was listed but, in dry-run, nothing was written.
    Unsaved {
        /// Number of entries captured.
        entries: usize,
    },
}

/// What happened (or would happen) to the report page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    /// Report page created.
    Created {
        /// New page id.
        id: String,
    },
    /// Existing report page updated.
    Updated {
        /// Page id.
        id: String,
        /// Version after the update.
        version: u32,
    },
    /// Dry-run: the page would be created.
    WouldCreate {
        /// Title of the page.
        title: String,
    },
    /// Dry-run: the existing page would be updated.
    WouldUpdate {
        /// Page id.
        id: String,
    },
}

/// Outcome of the diff and publish part of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    /// Size of each diff bucket.
    pub counts: DiffCounts,
    /// Title of the report page.
    pub title: String,
    /// Page write performed or skipped.
    pub action: PageAction,
    /// Rendered report body.
    pub html: String,
}

/// Result of a publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    /// Current snapshot handling.
    pub snapshot: SnapshotStatus,
    /// `None` when no previous label was given.
    pub report: Option<ReportOutcome>,
}
