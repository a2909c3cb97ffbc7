//! Versioned space snapshots for docdiff.
//!
//! A snapshot records the id, title and version number of every page in a
//! Confluence space at the time a release was built. Two snapshots are
//! compared with [`diff`] to find which pages changed between releases.
//!
//! - [`SnapshotEntry`] and [`Snapshot`]: the data model
//! - [`SnapshotStore`]: write-once JSON files keyed by `(space, label)`
//! - [`diff`]: classifies pages as changed, added or deleted
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), docdiff_snapshot::SnapshotError> {
//! use docdiff_snapshot::{SnapshotStore, diff};
//!
//! let store = SnapshotStore::new("snapshots");
//! let current = store.read("DOC", "2.0.0")?;
//! let previous = store.read("DOC", "1.0.0")?;
//!
//! let report = diff(current.entries(), previous.entries());
//! println!("{}", report.counts());
//! # Ok(())
//! # }
//! ```

mod diff;
mod entry;
mod error;
mod store;

pub use diff::{ChangedEntry, DiffCounts, DiffReport, diff};
pub use entry::{Snapshot, SnapshotEntry};
pub use error::SnapshotError;
pub use store::SnapshotStore;
