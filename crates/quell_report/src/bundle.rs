//! The diagnostic bundle document: a file table plus ordered diagnostics.

use crate::diagnostic::Diagnostic;
use crate::error::BundleError;
use quell_source::FileTable;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One analyzer run's findings and the files they reference.
///
/// Serialized as a JSON object with `files` and `diagnostics` keys; any other
/// top-level keys (analyzer metadata and the like) are preserved in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    /// The shared file table.
    pub files: FileTable,
    /// Findings in analyzer order.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
    /// Unrecognized top-level keys, preserved for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bundle {
    /// Decodes a bundle from JSON text.
    ///
    /// `origin` names the content in error messages.
    pub fn from_json_str(content: &str, origin: &str) -> Result<Self, BundleError> {
        serde_json::from_str(content).map_err(|e| BundleError::Malformed {
            origin: origin.to_string(),
            reason: e.to_string(),
        })
    }
}
