//! Bundle parsing with checker-name and identity-hash enrichment.
//!
//! The parser never fails outright. Whatever could be decoded is returned in
//! a [`ParsedBundle`], and a document-level problem is carried alongside in
//! [`ParsedBundle::failure`]. Individual diagnostics that cannot be decoded,
//! or that reference files outside the file table, are logged and skipped.

use std::path::{Path, PathBuf};

use quell_common::rewrite_in_place;
use quell_source::{FileIndex, FileTable, SourceDb};
use serde::Deserialize;
use serde_json::Value;

use crate::diagnostic::{Diagnostic, DiagnosticRecord, HashOrigin};
use crate::error::BundleError;
use crate::identity::{resolve_checker_name, resolve_identity_hash, ContentHasher, PathShapeHasher};

/// Result of parsing one bundle.
#[derive(Debug, Default)]
pub struct ParsedBundle {
    /// The bundle's file table, empty if it could not be read.
    pub files: FileTable,
    /// Resolved diagnostics in bundle order.
    pub diagnostics: Vec<DiagnosticRecord>,
    /// At least one identity hash was derived and written back.
    pub dirty: bool,
    /// The enriched bundle was persisted over the original.
    pub rewritten: bool,
    /// Why the document as a whole could not be read, if it could not.
    pub failure: Option<BundleError>,
}

impl ParsedBundle {
    fn failed(failure: BundleError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    /// Returns `true` if the document itself was readable.
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }
}

/// Turns bundles into [`DiagnosticRecord`]s.
///
/// Missing identity hashes are derived with the configured
/// [`ContentHasher`] from the primary source file, which is looked up in the
/// file table and joined onto `source_root` when one is set.
pub struct BundleParser {
    hasher: Box<dyn ContentHasher>,
    source_root: Option<PathBuf>,
    allow_rewrite: bool,
    sources: SourceDb,
}

impl Default for BundleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BundleParser {
    /// Creates a parser using [`PathShapeHasher`], no source root, and
    /// rewriting enabled.
    pub fn new() -> Self {
        Self {
            hasher: Box::new(PathShapeHasher),
            source_root: None,
            allow_rewrite: true,
            sources: SourceDb::new(),
        }
    }

    /// Replaces the content hasher.
    pub fn with_hasher(mut self, hasher: impl ContentHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    /// Sets the directory file-table entries are resolved against.
    pub fn with_source_root(mut self, root: Option<PathBuf>) -> Self {
        self.source_root = root;
        self
    }

    /// Controls whether enriched bundles are written back to disk.
    pub fn allow_rewrite(mut self, allow: bool) -> Self {
        self.allow_rewrite = allow;
        self
    }

    /// Mutable access to the source cache used for hashing.
    pub fn sources_mut(&mut self) -> &mut SourceDb {
        &mut self.sources
    }

    /// Resolves a file-table entry to the path its source is read from.
    pub fn resolve_source_path(&self, entry: &str) -> PathBuf {
        match &self.source_root {
            Some(root) => root.join(entry.trim_start_matches('/')),
            None => PathBuf::from(entry),
        }
    }

    /// Parses the bundle at `path`.
    ///
    /// If any identity hash had to be derived and rewriting is allowed, the
    /// enriched document replaces the file's content. A failed rewrite is
    /// logged and leaves `rewritten` unset; the parsed records are still
    /// returned.
    pub fn parse_file(&mut self, path: &Path) -> ParsedBundle {
        let origin = path.display().to_string();
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(source) => {
                tracing::error!("cannot read bundle {origin}: {source}");
                return ParsedBundle::failed(BundleError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let (mut parsed, document) = self.parse_document(&content, &origin);
        if parsed.dirty && self.allow_rewrite {
            if let Some(document) = document {
                parsed.rewritten = match persist(path, &document) {
                    Ok(()) => {
                        tracing::debug!("rewrote enriched bundle {origin}");
                        true
                    }
                    Err(e) => {
                        tracing::error!("{e}");
                        false
                    }
                };
            }
        }
        parsed
    }

    /// Parses bundle text. Nothing is written back.
    ///
    /// `origin` names the content in log messages and errors.
    pub fn parse_str(&mut self, content: &str, origin: &str) -> ParsedBundle {
        self.parse_document(content, origin).0
    }

    /// Decodes and enriches a document, returning the enriched JSON value
    /// when the document was readable.
    fn parse_document(&mut self, content: &str, origin: &str) -> (ParsedBundle, Option<Value>) {
        let mut document: Value = match serde_json::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                let failure = malformed(origin, e.to_string());
                tracing::error!("{failure}");
                return (ParsedBundle::failed(failure), None);
            }
        };
        let Some(object) = document.as_object_mut() else {
            let failure = malformed(origin, "top level is not an object");
            tracing::error!("{failure}");
            return (ParsedBundle::failed(failure), None);
        };

        let files = match object.get("files").map(FileTable::deserialize) {
            Some(Ok(files)) => files,
            Some(Err(e)) => {
                let failure = malformed(origin, format!("invalid `files`: {e}"));
                tracing::error!("{failure}");
                return (ParsedBundle::failed(failure), None);
            }
            None => {
                let failure = malformed(origin, "missing `files`");
                tracing::error!("{failure}");
                return (ParsedBundle::failed(failure), None);
            }
        };

        let mut parsed = ParsedBundle {
            files,
            ..ParsedBundle::default()
        };

        let raw_diagnostics = match object.get_mut("diagnostics") {
            None => return (parsed, Some(document)),
            Some(Value::Array(items)) => items,
            Some(_) => {
                let failure = malformed(origin, "`diagnostics` is not a list");
                tracing::error!("{failure}");
                parsed.failure = Some(failure);
                return (parsed, None);
            }
        };

        for (idx, raw) in raw_diagnostics.iter_mut().enumerate() {
            let diag = match Diagnostic::deserialize(&*raw) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!("skipping diagnostic #{idx} in {origin}: {e}");
                    continue;
                }
            };
            if let Some(bad) = out_of_range_file(&diag, &parsed.files) {
                tracing::warn!(
                    "skipping diagnostic #{idx} in {origin}: file index {} is outside the file table ({} entries)",
                    bad.as_raw(),
                    parsed.files.len()
                );
                continue;
            }

            let checker_name = resolve_checker_name(&diag, origin);
            let entry = parsed.files.get(diag.primary_file()).unwrap_or_default();
            let source_path = self.resolve_source_path(entry);
            let (identity_hash, hash_origin) = resolve_identity_hash(
                &diag,
                &source_path,
                &checker_name,
                &mut self.sources,
                self.hasher.as_ref(),
            );

            if hash_origin == HashOrigin::Derived {
                if let Some(fields) = raw.as_object_mut() {
                    fields.insert(
                        Diagnostic::IDENTITY_HASH_KEY.to_string(),
                        Value::String(identity_hash.clone()),
                    );
                }
                parsed.dirty = true;
            }

            parsed.diagnostics.push(DiagnosticRecord {
                checker_name,
                identity_hash,
                hash_origin,
                location: diag.location,
                description: diag.description,
                path: diag.path,
                extra: diag.extra,
            });
        }

        (parsed, Some(document))
    }
}

/// Parses bundle text with a default [`BundleParser`].
pub fn parse_bundle_str(content: &str, origin: &str) -> ParsedBundle {
    BundleParser::new().parse_str(content, origin)
}

fn malformed(origin: &str, reason: impl Into<String>) -> BundleError {
    BundleError::Malformed {
        origin: origin.to_string(),
        reason: reason.into(),
    }
}

/// Returns the first file index the diagnostic references that the table
/// does not contain.
fn out_of_range_file(diag: &Diagnostic, files: &FileTable) -> Option<FileIndex> {
    std::iter::once(diag.location.file)
        .chain(diag.path.iter().flat_map(|s| s.referenced_files()))
        .find(|idx| files.get(*idx).is_none())
}

fn persist(path: &Path, document: &Value) -> Result<(), BundleError> {
    let text = serde_json::to_string_pretty(document).map_err(|e| BundleError::Serialization {
        reason: e.to_string(),
    })?;
    rewrite_in_place(path, |_| text).map_err(|source| BundleError::Io {
        path: path.to_path_buf(),
        source,
    })
}
