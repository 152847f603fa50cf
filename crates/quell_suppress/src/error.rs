//! Error types for suppression store operations.

use std::path::PathBuf;

/// Errors surfaced by the suppression store.
///
/// Unlike bundle and rendering problems, these are hard errors: a store that
/// is misconfigured or whose backing file cannot be trusted must not be used.
#[derive(Debug, thiserror::Error)]
pub enum SuppressError {
    /// An I/O error occurred while reading or writing the suppression file.
    #[error("suppression file I/O error at {path}: {source}")]
    Io {
        /// The suppression file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A line of the suppression file is not a valid record.
    #[error("corrupt suppression file {path} at line {line}: {reason}")]
    Corrupt {
        /// The suppression file path.
        path: PathBuf,
        /// 1-based line number of the offending record.
        line: usize,
        /// What is wrong with the line.
        reason: String,
    },

    /// A writable store was requested without a backing file.
    #[error("a writable suppression store requires a backing file")]
    MissingBackingFile,
}
