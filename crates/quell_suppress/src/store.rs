//! The suppression store: policy over the suppression file.

use std::path::PathBuf;

use quell_common::basename;

use crate::error::SuppressError;
use crate::suppress_file::{self, SuppressRecord};

/// In-memory view of the suppression file plus the rules for changing it.
///
/// Without a backing file the store is permanently empty and read-only.
/// With one, records are loaded at construction and reloaded in full after
/// every write. Writes are silently skipped when the store is not writable.
#[derive(Debug)]
pub struct SuppressionStore {
    /// Backing suppression file, if any.
    backing_file: Option<PathBuf>,

    /// Whether `add` and `remove` touch the backing file.
    writable: bool,

    /// Records as of the last load.
    records: Vec<SuppressRecord>,
}

impl SuppressionStore {
    /// Opens a store over `backing_file`.
    ///
    /// Fails with [`SuppressError::MissingBackingFile`] if `writable` is set
    /// without a backing file, and with the load error if the file exists
    /// but cannot be read or parsed.
    pub fn new(backing_file: Option<PathBuf>, writable: bool) -> Result<Self, SuppressError> {
        if writable && backing_file.is_none() {
            return Err(SuppressError::MissingBackingFile);
        }
        let mut store = Self {
            backing_file,
            writable,
            records: Vec::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Returns the records as of the last load.
    pub fn records(&self) -> &[SuppressRecord] {
        &self.records
    }

    /// Returns `true` if a record matches `hash` and the basename of
    /// `file_path`.
    pub fn is_suppressed(&self, hash: &str, file_path: &str) -> bool {
        let file_name = basename(file_path);
        self.records.iter().any(|r| r.matches(hash, file_name))
    }

    /// Records a suppression for `hash` in `file_path`.
    ///
    /// Only the basename of `file_path` is stored. A no-op on a read-only
    /// store.
    pub fn add(&mut self, hash: &str, file_path: &str, comment: &str) -> Result<(), SuppressError> {
        let Some(path) = self.writable_file() else {
            return Ok(());
        };
        let record = SuppressRecord::new(hash, basename(file_path), comment);
        if suppress_file::append(&path, record)? {
            tracing::debug!("suppressed {hash} in {}", basename(file_path));
        }
        self.reload()
    }

    /// Removes every suppression for `hash` in `file_path`. A no-op on a
    /// read-only store.
    pub fn remove(&mut self, hash: &str, file_path: &str) -> Result<(), SuppressError> {
        let Some(path) = self.writable_file() else {
            return Ok(());
        };
        if suppress_file::remove(&path, hash, basename(file_path))? {
            tracing::debug!("unsuppressed {hash} in {}", basename(file_path));
        }
        self.reload()
    }

    /// Re-reads the backing file into memory.
    pub fn reload(&mut self) -> Result<(), SuppressError> {
        if let Some(path) = &self.backing_file {
            self.records = suppress_file::load(path)?;
        }
        Ok(())
    }

    fn writable_file(&self) -> Option<PathBuf> {
        self.backing_file.clone().filter(|_| self.writable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writable_without_file_fails() {
        let err = SuppressionStore::new(None, true).unwrap_err();
        assert!(matches!(err, SuppressError::MissingBackingFile));
    }

    #[test]
    fn no_file_is_empty_read_only() {
        let mut store = SuppressionStore::new(None, false).unwrap();
        store.add("h", "a.c", "x").unwrap();
        assert!(!store.is_suppressed("h", "a.c"));
        assert!(store.records().is_empty());
    }

    #[test]
    fn matching_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suppress");
        std::fs::write(&path, "H||a.c||\n").unwrap();

        let store = SuppressionStore::new(Some(path), false).unwrap();
        assert!(store.is_suppressed("H", "/x/a.c"));
        assert!(store.is_suppressed("H", "/y/a.c"));
        assert!(store.is_suppressed("H", "a.c"));
        assert!(!store.is_suppressed("H", "/x/b.c"));
        assert!(!store.is_suppressed("G", "/x/a.c"));
    }

    #[test]
    fn read_only_store_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suppress");
        std::fs::write(&path, "H||a.c||\n").unwrap();

        let mut store = SuppressionStore::new(Some(path.clone()), false).unwrap();
        store.add("K", "/src/b.c", "").unwrap();
        store.remove("H", "/src/a.c").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "H||a.c||\n");
        assert!(store.is_suppressed("H", "a.c"));
    }

    #[test]
    fn add_then_remove_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suppress");

        let mut store = SuppressionStore::new(Some(path.clone()), true).unwrap();
        store.add("H", "/src/lib/a.c", "intentional").unwrap();
        assert!(store.is_suppressed("H", "/other/a.c"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "H||a.c||intentional\n");

        store.remove("H", "/elsewhere/a.c").unwrap();
        assert!(!store.is_suppressed("H", "a.c"));
        assert!(store.records().is_empty());
    }

    #[test]
    fn external_edits_are_seen_after_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suppress");
        let mut store = SuppressionStore::new(Some(path.clone()), true).unwrap();

        std::fs::write(&path, "X||x.c||added elsewhere\n").unwrap();
        store.add("H", "a.c", "").unwrap();
        assert!(store.is_suppressed("X", "x.c"));
        assert!(store.is_suppressed("H", "a.c"));
    }

    #[test]
    fn corrupt_file_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suppress");
        std::fs::write(&path, "not a record\n").unwrap();
        let err = SuppressionStore::new(Some(path), false).unwrap_err();
        assert!(matches!(err, SuppressError::Corrupt { line: 1, .. }));
    }
}
