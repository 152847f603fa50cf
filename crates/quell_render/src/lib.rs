//! Plain-text rendering of findings with per-pass statistics.
//!
//! The [`Formatter`] walks resolved diagnostics, drops those that are
//! excluded or suppressed (promoting inline suppression markers into the
//! suppression store along the way), renders the rest, and returns
//! [`ReportStats`] for the pass.

#![warn(missing_docs)]

pub mod error;
pub mod formatter;
pub mod severity;
pub mod stats;

pub use error::ReportError;
pub use formatter::Formatter;
pub use severity::{SeverityMap, UNSPECIFIED_SEVERITY};
pub use stats::{ReportStats, ReportTotals};
