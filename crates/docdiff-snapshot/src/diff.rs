//! Snapshot comparison.

use std::collections::BTreeMap;
use std::fmt;

use crate::entry::SnapshotEntry;

/// A page present in both snapshots with a different version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedEntry {
    /// The entry as it is in the current snapshot.
    pub current: SnapshotEntry,
    /// Version number in the previous snapshot.
    pub previous_version: u32,
}

/// Classification of pages between two snapshots.
///
/// Each bucket is sorted by id. Pages present in both snapshots with the same
/// version appear in none of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    /// Pages whose version differs.
    pub changed: Vec<ChangedEntry>,
    /// Pages only in the current snapshot.
    pub added: Vec<SnapshotEntry>,
    /// Pages only in the previous snapshot.
    pub deleted: Vec<SnapshotEntry>,
}

impl DiffReport {
    /// Bucket sizes.
    pub fn counts(&self) -> DiffCounts {
        DiffCounts {
            changed: self.changed.len(),
            added: self.added.len(),
            deleted: self.deleted.len(),
        }
    }

    /// Whether nothing changed between the snapshots.
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Number of pages in each bucket of a [`DiffReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffCounts {
    pub changed: usize,
    pub added: usize,
    pub deleted: usize,
}

impl fmt::Display for DiffCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changed, {} added, {} deleted",
            self.changed, self.added, self.deleted
        )
    }
}

/// Compare two snapshots.
///
/// Entries are matched by id. Versions are compared as integers, so a
/// version that went backwards still counts as changed.
pub fn diff(current: &[SnapshotEntry], previous: &[SnapshotEntry]) -> DiffReport {
    let current_by_id = by_id(current);
    let previous_by_id = by_id(previous);

    let mut report = DiffReport::default();

    for (id, entry) in &current_by_id {
        match previous_by_id.get(id) {
            Some(old) if old.version != entry.version => report.changed.push(ChangedEntry {
                current: (*entry).clone(),
                previous_version: old.version,
            }),
            Some(_) => {}
            None => report.added.push((*entry).clone()),
        }
    }

    report.deleted = previous_by_id
        .iter()
        .filter(|(id, _)| !current_by_id.contains_key(*id))
        .map(|(_, entry)| (*entry).clone())
        .collect();

    report
}

fn by_id(entries: &[SnapshotEntry]) -> BTreeMap<&str, &SnapshotEntry> {
    entries.iter().map(|e| (e.id.as_str(), e)).collect()
}
