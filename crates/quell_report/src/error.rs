//! Error types for bundle reading, decoding, and rewriting.

use std::path::PathBuf;

/// Errors that can occur while handling a diagnostic bundle.
///
/// The parser never returns these directly: it degrades to an empty or
/// partial result and carries the error in [`ParsedBundle::failure`] so that
/// callers decide whether a bad bundle is fatal.
///
/// [`ParsedBundle::failure`]: crate::ParsedBundle::failure
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// An I/O error occurred while reading or writing a bundle file.
    #[error("bundle I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The bundle content is not a structurally valid bundle document.
    #[error("malformed bundle {origin}: {reason}")]
    Malformed {
        /// Where the content came from (file path or a caller-supplied name).
        origin: String,
        /// Description of the structural problem.
        reason: String,
    },

    /// The bundle could not be serialized back to text.
    #[error("failed to serialize bundle: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = BundleError::Io {
            path: PathBuf::from("/tmp/reports/main.c.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("bundle I/O error"));
        assert!(msg.contains("main.c.json"));
    }

    #[test]
    fn malformed_display() {
        let err = BundleError::Malformed {
            origin: "report.json".to_string(),
            reason: "missing 'files'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed bundle report.json: missing 'files'"
        );
    }

    #[test]
    fn serialization_display() {
        let err = BundleError::Serialization {
            reason: "key must be a string".to_string(),
        };
        assert!(err.to_string().contains("key must be a string"));
    }
}
