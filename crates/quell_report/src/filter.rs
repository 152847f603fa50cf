//! File-exclusion filtering of bundles.
//!
//! Filtering drops whole diagnostics by their primary file and never touches
//! the file table. Pruning unreferenced entries would require renumbering
//! every location in every surviving diagnostic; the table is left as-is
//! instead, at the cost of possibly carrying unused entries.

use std::collections::BTreeSet;
use std::path::Path;

use quell_common::rewrite_in_place;
use quell_source::{FileIndex, FileTable};
use serde::Deserialize;
use serde_json::Value;

use crate::bundle::Bundle;
use crate::error::BundleError;

/// Decides whether findings in a file are excluded from reporting.
pub trait SkipPolicy {
    /// Returns `true` if findings whose file is `path` should be dropped.
    fn should_skip(&self, path: &str) -> bool;
}

impl<F> SkipPolicy for F
where
    F: Fn(&str) -> bool,
{
    fn should_skip(&self, path: &str) -> bool {
        self(path)
    }
}

/// Summary of one [`filter_bundle`] pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Number of diagnostics retained.
    pub kept: usize,
    /// Number of diagnostics dropped.
    pub removed: usize,
    /// Every file index referenced by a retained diagnostic, including
    /// those only reachable through path ranges and edges.
    pub referenced_files: BTreeSet<FileIndex>,
}

/// Drops every diagnostic whose primary file is excluded by `policy`.
///
/// Retained diagnostics keep their original order. A diagnostic whose
/// primary file index is outside the file table cannot be judged and is
/// retained.
pub fn filter_bundle(bundle: &mut Bundle, policy: &dyn SkipPolicy) -> FilterOutcome {
    let before = bundle.diagnostics.len();
    let files = &bundle.files;
    bundle.diagnostics.retain(|diag| match files.get(diag.primary_file()) {
        Some(path) => !policy.should_skip(path),
        None => {
            tracing::debug!(
                "file index {} is outside the file table, keeping diagnostic",
                diag.primary_file().as_raw()
            );
            true
        }
    });

    let mut referenced_files = BTreeSet::new();
    for diag in &bundle.diagnostics {
        referenced_files.insert(diag.primary_file());
        for step in &diag.path {
            referenced_files.extend(step.referenced_files());
        }
    }

    FilterOutcome {
        kept: bundle.diagnostics.len(),
        removed: before - bundle.diagnostics.len(),
        referenced_files,
    }
}

/// Filters bundle text, returning the re-encoded result.
///
/// Only the `diagnostics` array is edited, entry by entry, so every other
/// value (including fields of retained diagnostics) survives as decoded.
/// Content that cannot be decoded or re-encoded is returned unchanged.
pub fn remove_skipped_reports(content: &str, policy: &dyn SkipPolicy) -> String {
    let mut document: Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("invalid bundle: {e}; leaving bundle unfiltered");
            return content.to_string();
        }
    };
    let removed = match retain_unskipped(&mut document, policy) {
        Ok(removed) => removed,
        Err(reason) => {
            tracing::warn!("invalid bundle: {reason}; leaving bundle unfiltered");
            return content.to_string();
        }
    };
    if removed == 0 {
        return content.to_string();
    }
    match serde_json::to_string_pretty(&document) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("{e}; leaving bundle unfiltered");
            content.to_string()
        }
    }
}

/// Filters the bundle at `path` in place. A missing bundle is an error and
/// is not created.
pub fn skip_reports_in_file(path: &Path, policy: &dyn SkipPolicy) -> Result<(), BundleError> {
    rewrite_in_place(path, |content| remove_skipped_reports(content, policy)).map_err(|source| {
        BundleError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Drops excluded entries from the raw `diagnostics` array and returns how
/// many were removed.
fn retain_unskipped(document: &mut Value, policy: &dyn SkipPolicy) -> Result<usize, String> {
    let object = document
        .as_object_mut()
        .ok_or("top level is not an object")?;
    let files = match object.get("files") {
        Some(files) => FileTable::deserialize(files).map_err(|e| format!("invalid `files`: {e}"))?,
        None => return Err("missing `files`".to_string()),
    };
    let items = match object.get_mut("diagnostics") {
        None => return Ok(0),
        Some(Value::Array(items)) => items,
        Some(_) => return Err("`diagnostics` is not a list".to_string()),
    };

    let before = items.len();
    items.retain(|diag| match raw_primary_file(diag).and_then(|idx| files.get(idx)) {
        Some(path) => !policy.should_skip(path),
        None => {
            tracing::debug!("diagnostic without a resolvable primary file, keeping it");
            true
        }
    });
    Ok(before - items.len())
}

/// Reads `location.file` from an undecoded diagnostic.
fn raw_primary_file(diag: &Value) -> Option<FileIndex> {
    let raw = diag.get("location")?.get("file")?.as_u64()?;
    usize::try_from(raw).ok().map(FileIndex::from_raw)
}
