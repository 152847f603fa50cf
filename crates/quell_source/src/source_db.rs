//! Cache of source files read while correlating and rendering reports.

use crate::source_file::SourceFile;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Lazily loads and caches source files by path.
///
/// Reports in one bundle usually point into a handful of files, so each file
/// is read at most once per `SourceDb`. Files that cannot be read are
/// remembered as missing; lookups against them return `None` instead of an
/// error, which callers treat as "no source context available".
#[derive(Default)]
pub struct SourceDb {
    files: HashMap<PathBuf, Option<SourceFile>>,
}

impl SourceDb {
    /// Creates an empty source database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source file from an in-memory string (useful for tests).
    pub fn add_source(&mut self, name: impl Into<PathBuf>, content: String) {
        let path = name.into();
        let file = SourceFile::new(path.clone(), content);
        self.files.insert(path, Some(file));
    }

    /// Returns the file at `path`, reading it from disk on first access.
    pub fn file(&mut self, path: &Path) -> Option<&SourceFile> {
        self.files
            .entry(path.to_path_buf())
            .or_insert_with(|| match std::fs::read_to_string(path) {
                Ok(content) => Some(SourceFile::new(path.to_path_buf(), content)),
                Err(e) => {
                    tracing::debug!("cannot read source file {}: {e}", path.display());
                    None
                }
            })
            .as_ref()
    }

    /// Returns the full content of the file at `path`.
    pub fn content(&mut self, path: &Path) -> Option<&str> {
        self.file(path).map(|f| f.content.as_str())
    }

    /// Returns the 1-indexed `line` of the file at `path`.
    pub fn line(&mut self, path: &Path, line: u32) -> Option<&str> {
        self.file(path)?.line(line)
    }
}
