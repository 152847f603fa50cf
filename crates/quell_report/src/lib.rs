//! Diagnostic bundle model, parsing, identity resolution, and file exclusion.
//!
//! A diagnostic bundle is the output of one analyzer run: a [`FileTable`]
//! plus an ordered list of [`Diagnostic`]s whose locations index into that
//! table. [`BundleParser`] turns a bundle into [`DiagnosticRecord`]s with a
//! resolved checker name and a stable identity hash, re-persisting the bundle
//! when hashes had to be derived. [`filter_bundle`] drops diagnostics whose
//! primary file is excluded without ever renumbering the file table.
//!
//! [`FileTable`]: quell_source::FileTable

#![warn(missing_docs)]

pub mod bundle;
pub mod diagnostic;
pub mod error;
pub mod filter;
pub mod identity;
pub mod location;
pub mod parser;

pub use bundle::Bundle;
pub use diagnostic::{Diagnostic, DiagnosticRecord, Edge, HashOrigin, PathStep, StepKind};
pub use error::BundleError;
pub use filter::{
    filter_bundle, remove_skipped_reports, skip_reports_in_file, FilterOutcome, SkipPolicy,
};
pub use identity::{
    resolve_checker_name, resolve_identity_hash, ContentHasher, PathShapeHasher, UNKNOWN_CHECKER,
};
pub use location::Location;
pub use parser::{parse_bundle_str, BundleParser, ParsedBundle};
