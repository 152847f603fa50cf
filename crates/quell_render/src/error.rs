//! Error types for report rendering.

use std::path::PathBuf;

use quell_report::BundleError;

/// Errors that end a rendering pass.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The bundle could not be parsed; nothing was rendered.
    #[error("the generated bundle {path} is not valid: {source}")]
    InvalidBundle {
        /// The bundle path.
        path: PathBuf,
        /// Why the bundle could not be read.
        source: BundleError,
    },

    /// Writing to the output stream failed.
    #[error("failed to write report output: {source}")]
    Output {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
