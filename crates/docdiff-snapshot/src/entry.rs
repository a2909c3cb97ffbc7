//! Snapshot data model.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SnapshotError;

/// One content item at snapshot time.
///
/// Fields are declared in alphabetical order so the serialized keys are
/// sorted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SnapshotEntry {
    /// Content id, unique within a snapshot.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Relative link to the item. Informational only.
    #[serde(default)]
    pub url: String,
    /// Version number of the item. Always at least 1.
    #[serde(deserialize_with = "positive_version")]
    pub version: u32,
}

fn positive_version<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match u32::deserialize(deserializer)? {
        0 => Err(serde::de::Error::custom("version must be a positive integer")),
        version => Ok(version),
    }
}

impl SnapshotEntry {
    /// Create an entry.
    pub fn new(
        id: impl Into<String>,
        version: u32,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            version,
        }
    }
}

/// All entries of one space captured under a caller-chosen label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    space: String,
    label: String,
    entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    /// Build a snapshot, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::DuplicateId`] if two entries share an id.
    pub fn new(
        space: impl Into<String>,
        label: impl Into<String>,
        entries: Vec<SnapshotEntry>,
    ) -> Result<Self, SnapshotError> {
        if let Some(id) = first_duplicate(&entries) {
            return Err(SnapshotError::DuplicateId { id });
        }

        Ok(Self {
            space: space.into(),
            label: label.into(),
            entries,
        })
    }

    /// Space key.
    pub fn space(&self) -> &str {
        &self.space
    }

    /// Version label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Entries in capture order.
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn first_duplicate(entries: &[SnapshotEntry]) -> Option<String> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .iter()
        .find(|e| !seen.insert(e.id.as_str()))
        .map(|e| e.id.clone())
}
