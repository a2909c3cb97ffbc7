//! Write-once snapshot files.
//!
//! [`SnapshotStore`] keeps one JSON file per `(space, label)` under a root
//! directory:
//!
//! ```text
//! {root}/
//! +-- confluence-DOC-1.0.0.version
//! +-- confluence-DOC-1.1.0.version
//! ```
//!
//! Each file is a JSON array of entries sorted by id, with keys in
//! alphabetical order and four-space indentation. Files are never rewritten,
//! and a snapshot appears at its final path only once it is complete: the
//! content goes to a temporary file in the same directory, which is then
//! linked into place without replacing an existing file.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::entry::{Snapshot, SnapshotEntry};
use crate::error::SnapshotError;

/// Filesystem store for snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the snapshot for `(space, label)`.
    pub fn path_for(&self, space: &str, label: &str) -> PathBuf {
        self.root.join(format!("confluence-{space}-{label}.version"))
    }

    /// Whether a snapshot for `(space, label)` has been persisted.
    pub fn exists(&self, space: &str, label: &str) -> bool {
        self.path_for(space, label).is_file()
    }

    /// Persist a snapshot and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::AlreadyExists`] if the file is already there,
    /// or [`SnapshotError::Io`] if it cannot be written.
    pub fn write(&self, snapshot: &Snapshot) -> Result<PathBuf, SnapshotError> {
        let path = self.path_for(snapshot.space(), snapshot.label());
        let bytes = serialize(snapshot.entries()).map_err(|e| SnapshotError::Io {
            path: path.clone(),
            source: e.into(),
        })?;

        self.write_atomic(&path, |file| file.write_all(&bytes))?;

        tracing::info!(
            path = %path.display(),
            entries = snapshot.len(),
            "Wrote snapshot"
        );
        Ok(path)
    }

    /// Fill a temporary file with `fill`, then move it to `path`.
    ///
    /// On any failure the temporary file is removed and `path` is untouched.
    fn write_atomic(
        &self,
        path: &Path,
        fill: impl FnOnce(&mut File) -> io::Result<()>,
    ) -> Result<(), SnapshotError> {
        let io_err = |source: io::Error| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(io_err)?;
        let mut temp = NamedTempFile::new_in(&self.root).map_err(io_err)?;
        fill(temp.as_file_mut()).map_err(io_err)?;
        temp.as_file().sync_all().map_err(io_err)?;

        match temp.persist_noclobber(path) {
            Ok(_) => Ok(()),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                Err(SnapshotError::AlreadyExists(path.to_path_buf()))
            }
            Err(e) => Err(io_err(e.error)),
        }
    }

    /// Load the snapshot for `(space, label)`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::NotFound`] if the file is absent,
    /// [`SnapshotError::Format`] if it is not an array of entries, and
    /// [`SnapshotError::DuplicateId`] if it lists an id twice.
    pub fn read(&self, space: &str, label: &str) -> Result<Snapshot, SnapshotError> {
        let path = self.path_for(space, label);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SnapshotError::NotFound(path));
            }
            Err(source) => return Err(SnapshotError::Io { path, source }),
        };

        let entries: Vec<SnapshotEntry> = match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(source) => return Err(SnapshotError::Format { path, source }),
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "Read snapshot");
        Snapshot::new(space, label, entries)
    }
}

/// Serialize entries sorted by id with four-space indentation.
fn serialize(entries: &[SnapshotEntry]) -> Result<Vec<u8>, serde_json::Error> {
    let mut sorted: Vec<&SnapshotEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    sorted.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}
