//! Persisted and inline suppression of findings.
//!
//! A [`SuppressionStore`] holds `(hash, file basename, comment)` records
//! backed by a flat suppression file. Matching ignores directories, so a
//! suppression recorded against `/x/a.c` also covers `/y/a.c`. The
//! [`inline`] module recognizes `quell_suppress` markers in source comments;
//! callers promote what it finds into the store.

#![warn(missing_docs)]

pub mod error;
pub mod inline;
pub mod store;
pub mod suppress_file;

pub use error::SuppressError;
pub use inline::{detect_inline_suppression, InlineSuppression, SUPPRESS_MARKER};
pub use store::SuppressionStore;
pub use suppress_file::SuppressRecord;
