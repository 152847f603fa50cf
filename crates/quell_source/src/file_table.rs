//! The ordered table of source paths referenced by a diagnostic bundle.

use serde::{Deserialize, Serialize};

/// Index into a [`FileTable`].
///
/// Bundles store locations as `(file, line, col)` where `file` is this index.
/// Indices are never renumbered once a bundle has been read.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileIndex(usize);

impl FileIndex {
    /// Creates a `FileIndex` from a raw position.
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw position of this index.
    pub fn as_raw(self) -> usize {
        self.0
    }
}

/// Ordered sequence of source file paths.
///
/// The table is append-only from the point of view of this crate: nothing
/// removes or reorders entries, so every [`FileIndex`] handed out stays valid
/// for the lifetime of the bundle even when diagnostics are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileTable {
    paths: Vec<String>,
}

impl FileTable {
    /// Creates an empty file table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a path and returns its index.
    pub fn push(&mut self, path: impl Into<String>) -> FileIndex {
        self.paths.push(path.into());
        FileIndex(self.paths.len() - 1)
    }

    /// Returns the path at `index`, or `None` if it is out of range.
    pub fn get(&self, index: FileIndex) -> Option<&str> {
        self.paths.get(index.0).map(String::as_str)
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterates over `(index, path)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (FileIndex, &str)> {
        self.paths
            .iter()
            .enumerate()
            .map(|(i, p)| (FileIndex(i), p.as_str()))
    }
}

impl<S: Into<String>> FromIterator<S> for FileTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}
