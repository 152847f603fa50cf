//! Source file representation with line-start indexing for fast line lookup.

use std::path::PathBuf;

/// A source file read from disk for rendering or hashing.
///
/// Stores the file's content along with precomputed line-start offsets so
/// that repeated line lookups for the same file stay cheap.
pub struct SourceFile {
    /// The filesystem path of this file (or a synthetic name for in-memory sources).
    pub path: PathBuf,
    /// The full text content of the file.
    pub content: String,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Creates a new `SourceFile` with precomputed line starts.
    pub fn new(path: PathBuf, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            path,
            content,
            line_starts,
        }
    }

    /// Returns the 1-indexed line `line` without its line terminator.
    ///
    /// Returns `None` for line 0 and for lines past the end of the file.
    pub fn line(&self, line: u32) -> Option<&str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        if start >= self.content.len() && idx > 0 {
            return None;
        }
        let end = self
            .line_starts
            .get(idx + 1)
            .copied()
            .unwrap_or(self.content.len());
        let text = &self.content[start..end];
        Some(text.trim_end_matches(['\n', '\r']))
    }

    /// Returns the number of lines in the file.
    pub fn line_count(&self) -> usize {
        if self.content.ends_with('\n') {
            self.line_starts.len() - 1
        } else {
            self.line_starts.len()
        }
    }
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &str) -> Vec<usize> {
    let mut starts = vec![0usize];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}
