//! Checker-name and identity-hash resolution.
//!
//! Newer analyzers write both a checker name and an identity hash into every
//! diagnostic. Older ones omit one or both; this module fills the gaps so
//! that every record leaving the parser has a usable identity.

use crate::diagnostic::{Diagnostic, HashOrigin, PathStep};
use quell_common::ContentHashBuilder;
use quell_source::SourceDb;
use std::path::Path;

/// Checker name used when a diagnostic does not carry one.
pub const UNKNOWN_CHECKER: &str = "unknown";

/// Derives an identity hash from a finding's path shape and source text.
///
/// Implementations must be deterministic: the same inputs must always yield
/// the same hash, otherwise cross-run deduplication and suppression matching
/// break.
pub trait ContentHasher {
    /// Computes the identity hash for a finding.
    fn content_hash(&self, path: &[PathStep], source_text: &str, checker_name: &str) -> String;
}

/// Default [`ContentHasher`] based on the shape of the bug path.
///
/// Hashes the checker name, the trimmed source line, column and message of
/// the last path step, and every step's kind together with its line offset
/// relative to the last step. Relative offsets keep the hash stable when
/// unrelated code above the finding shifts it up or down.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathShapeHasher;

impl ContentHasher for PathShapeHasher {
    fn content_hash(&self, path: &[PathStep], source_text: &str, checker_name: &str) -> String {
        let mut builder = ContentHashBuilder::new().field(checker_name);

        let anchor = path.last().and_then(|s| s.location.as_ref());
        if let (Some(last), Some(loc)) = (path.last(), anchor) {
            let line_text = (loc.line as usize)
                .checked_sub(1)
                .and_then(|idx| source_text.lines().nth(idx))
                .unwrap_or("")
                .trim();
            builder = builder
                .field(line_text)
                .int(i64::from(loc.col))
                .field(last.message.as_deref().unwrap_or(""));
        }

        let anchor_line = anchor.map_or(0, |l| i64::from(l.line));
        for step in path {
            let offset = step
                .location
                .as_ref()
                .map_or(0, |l| i64::from(l.line) - anchor_line);
            builder = builder.field(step.kind.as_str()).int(offset);
        }

        builder.finish().to_hex()
    }
}

/// Returns the diagnostic's checker name, or [`UNKNOWN_CHECKER`].
///
/// A missing name is not an error; it is logged as a warning naming `origin`
/// (the bundle the diagnostic came from).
pub fn resolve_checker_name(diag: &Diagnostic, origin: &str) -> String {
    match diag.checker_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            tracing::warn!("checker name was not found in bundle '{origin}'");
            UNKNOWN_CHECKER.to_string()
        }
    }
}

/// Returns the diagnostic's identity hash and where it came from.
///
/// A hash present in the bundle is trusted as-is. Otherwise `hasher` is run
/// over the diagnostic's path, the contents of `source_path`, and
/// `checker_name`. An unreadable source file hashes as empty text.
pub fn resolve_identity_hash(
    diag: &Diagnostic,
    source_path: &Path,
    checker_name: &str,
    sources: &mut SourceDb,
    hasher: &dyn ContentHasher,
) -> (String, HashOrigin) {
    if let Some(hash) = diag.identity_hash.as_deref().filter(|h| !h.is_empty()) {
        return (hash.to_string(), HashOrigin::Source);
    }
    let source_text = sources.content(source_path).unwrap_or_default();
    let hash = hasher.content_hash(&diag.path, source_text, checker_name);
    (hash, HashOrigin::Derived)
}
