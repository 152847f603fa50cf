//! Checker-name to severity mapping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Severity reported for checkers missing from the map.
pub const UNSPECIFIED_SEVERITY: &str = "UNSPECIFIED";

/// Maps checker names to severity labels such as `HIGH` or `STYLE`.
///
/// Encoded as a flat JSON object or TOML table of `checker = "SEVERITY"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeverityMap {
    entries: HashMap<String, String>,
}

impl SeverityMap {
    /// Creates an empty map; every checker is [`UNSPECIFIED_SEVERITY`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a map from a JSON object.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Sets the severity of `checker`.
    pub fn insert(&mut self, checker: impl Into<String>, severity: impl Into<String>) {
        self.entries.insert(checker.into(), severity.into());
    }

    /// Adds every entry of `other`, overriding existing ones.
    pub fn extend(&mut self, other: SeverityMap) {
        self.entries.extend(other.entries);
    }

    /// Returns the severity of `checker`, or [`UNSPECIFIED_SEVERITY`].
    pub fn severity_of(&self, checker: &str) -> &str {
        self.entries
            .get(checker)
            .map_or(UNSPECIFIED_SEVERITY, String::as_str)
    }

    /// Returns the number of mapped checkers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no checker is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SeverityMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
