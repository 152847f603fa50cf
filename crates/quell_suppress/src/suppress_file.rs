//! The flat suppression file.
//!
//! One record per line, `hash||file_basename||comment`. Blank lines are
//! ignored. Every write is a full read-modify-write of the file through a
//! single handle; concurrent writers are not coordinated.

use std::path::Path;

use quell_common::rewrite_or_create;

use crate::error::SuppressError;

/// Separator between the fields of one record.
pub const FIELD_SEPARATOR: &str = "||";

/// One persisted suppression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuppressRecord {
    /// Identity hash of the suppressed finding.
    pub hash: String,
    /// Basename of the file the finding is reported in.
    pub file_name: String,
    /// Free-form reason, possibly empty.
    pub comment: String,
}

impl SuppressRecord {
    /// Creates a record. Line breaks in `comment` are flattened to spaces.
    pub fn new(hash: impl Into<String>, file_name: impl Into<String>, comment: &str) -> Self {
        Self {
            hash: hash.into(),
            file_name: file_name.into(),
            comment: comment.replace(['\r', '\n'], " "),
        }
    }

    /// Returns `true` if this record is for `hash` in a file named `file_name`.
    pub fn matches(&self, hash: &str, file_name: &str) -> bool {
        self.hash == hash && self.file_name == file_name
    }

    fn to_line(&self) -> String {
        [
            self.hash.as_str(),
            self.file_name.as_str(),
            self.comment.as_str(),
        ]
        .join(FIELD_SEPARATOR)
    }
}

/// Parses suppression file content. `path` is used in error messages only.
pub fn parse(content: &str, path: &Path) -> Result<Vec<SuppressRecord>, SuppressError> {
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.splitn(3, FIELD_SEPARATOR).collect();
        let corrupt = |reason: String| SuppressError::Corrupt {
            path: path.to_path_buf(),
            line: idx + 1,
            reason,
        };
        let [hash, file_name, comment] = fields.as_slice() else {
            return Err(corrupt(format!("expected 3 fields, found {}", fields.len())));
        };
        if hash.trim().is_empty() {
            return Err(corrupt("empty hash".to_string()));
        }
        records.push(SuppressRecord {
            hash: hash.trim().to_string(),
            file_name: file_name.trim().to_string(),
            comment: comment.to_string(),
        });
    }
    Ok(records)
}

/// Encodes records as suppression file content.
pub fn render(records: &[SuppressRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_line());
        out.push('\n');
    }
    out
}

/// Reads every record from the suppression file. A missing file is empty.
pub fn load(path: &Path) -> Result<Vec<SuppressRecord>, SuppressError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(SuppressError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Appends `record` unless a record for the same hash and file exists.
///
/// Returns `true` if the file changed.
pub fn append(path: &Path, record: SuppressRecord) -> Result<bool, SuppressError> {
    update(path, |records| {
        if records
            .iter()
            .any(|r| r.matches(&record.hash, &record.file_name))
        {
            return false;
        }
        records.push(record);
        true
    })
}

/// Removes every record for `hash` in a file named `file_name`.
///
/// Returns `true` if the file changed.
pub fn remove(path: &Path, hash: &str, file_name: &str) -> Result<bool, SuppressError> {
    update(path, |records| {
        let before = records.len();
        records.retain(|r| !r.matches(hash, file_name));
        records.len() != before
    })
}

/// Runs `mutate` over the parsed file and writes the result back through
/// one handle. Corrupt content is left untouched and the error returned.
fn update<F>(path: &Path, mutate: F) -> Result<bool, SuppressError>
where
    F: FnOnce(&mut Vec<SuppressRecord>) -> bool,
{
    let mut outcome = Ok(false);
    rewrite_or_create(path, |content| match parse(content, path) {
        Ok(mut records) => {
            if mutate(&mut records) {
                outcome = Ok(true);
                render(&records)
            } else {
                content.to_string()
            }
        }
        Err(e) => {
            outcome = Err(e);
            content.to_string()
        }
    })
    .map_err(|source| SuppressError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    outcome
}
