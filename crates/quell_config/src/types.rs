//! Configuration types deserialized from `quell.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level `quell.toml` configuration. Every section is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuellConfig {
    /// Bundle parsing and rendering options.
    pub report: ReportConfig,
    /// Checker name to severity label.
    pub severity: BTreeMap<String, String>,
    /// Suppression file options.
    pub suppress: SuppressConfig,
    /// File exclusion patterns.
    pub skip: SkipConfig,
}

/// The `[report]` section.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory file-table entries are resolved against.
    pub source_root: Option<PathBuf>,
    /// Write derived identity hashes back into bundles.
    pub allow_rewrite: bool,
    /// List event steps under each finding.
    pub print_steps: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            source_root: None,
            allow_rewrite: true,
            print_steps: false,
        }
    }
}

/// The `[suppress]` section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SuppressConfig {
    /// Suppression file, relative to the configuration file's directory.
    pub file: Option<PathBuf>,
    /// Allow adding and removing suppressions.
    pub writable: bool,
}

impl SuppressConfig {
    /// Returns the suppression file resolved against `base`.
    pub fn file_in(&self, base: &Path) -> Option<PathBuf> {
        self.file.as_ref().map(|f| base.join(f))
    }
}

/// The `[skip]` section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SkipConfig {
    /// Ordered `+glob` / `-glob` patterns; the first match decides.
    pub patterns: Vec<String>,
}
