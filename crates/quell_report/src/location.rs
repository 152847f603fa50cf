//! Source locations as stored in bundles.

use quell_source::FileIndex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `(file, line, col)` position inside a bundle.
///
/// `file` indexes the bundle's file table; `line` and `col` are 1-based.
/// Keys the analyzer emits beyond these three are kept in `extra` and written
/// back unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub col: u32,
    /// Index into the bundle's file table.
    pub file: FileIndex,
    /// Unrecognized keys, preserved for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    /// Creates a location with no extra keys.
    pub fn new(file: FileIndex, line: u32, col: u32) -> Self {
        Self {
            line,
            col,
            file,
            extra: Map::new(),
        }
    }
}
