//! Diagnostic records: the wire form read from bundles and the resolved form
//! handed to filtering and rendering.

use crate::location::Location;
use quell_source::FileIndex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of a path step.
///
/// Analyzers emit `event` steps (the narrative of the bug) and `control`
/// steps (branch edges); any other kind is kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepKind {
    /// A step in the narrative of the finding, carrying a message.
    Event,
    /// A control-flow edge between two source ranges.
    Control,
    /// Any other step kind emitted by the analyzer.
    Other(String),
}

impl StepKind {
    /// Returns the kind as it appears in a bundle.
    pub fn as_str(&self) -> &str {
        match self {
            StepKind::Event => "event",
            StepKind::Control => "control",
            StepKind::Other(s) => s,
        }
    }
}

impl From<String> for StepKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "event" => StepKind::Event,
            "control" => StepKind::Control,
            _ => StepKind::Other(s),
        }
    }
}

impl From<StepKind> for String {
    fn from(kind: StepKind) -> Self {
        match kind {
            StepKind::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A control-flow edge between two location lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Locations spanning the edge source.
    #[serde(default)]
    pub start: Vec<Location>,
    /// Locations spanning the edge target.
    #[serde(default)]
    pub end: Vec<Location>,
    /// Unrecognized keys, preserved for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of a finding's execution path.
///
/// Ranges and edges are only consulted to learn which files a diagnostic
/// touches; they never take part in identity hashing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    /// The step kind.
    pub kind: StepKind,
    /// Where the step happens. Control steps may carry only edges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Human-readable step message (events only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Highlighted source ranges, each a list of locations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<Vec<Location>>,
    /// Control-flow edges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<Edge>,
    /// Unrecognized keys, preserved for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PathStep {
    /// Creates an event step at `location` with `message`.
    pub fn event(location: Location, message: impl Into<String>) -> Self {
        Self {
            kind: StepKind::Event,
            location: Some(location),
            message: Some(message.into()),
            ranges: Vec::new(),
            edges: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Returns `true` if this is an event step.
    pub fn is_event(&self) -> bool {
        self.kind == StepKind::Event
    }

    /// Collects every file index this step references: its location, its
    /// ranges, and both ends of its edges.
    pub fn referenced_files(&self) -> impl Iterator<Item = FileIndex> + '_ {
        let ranges = self.ranges.iter().flatten();
        let edges = self
            .edges
            .iter()
            .flat_map(|e| e.start.iter().chain(e.end.iter()));
        self.location
            .iter()
            .chain(ranges)
            .chain(edges)
            .map(|loc| loc.file)
    }
}

/// A diagnostic exactly as stored in a bundle.
///
/// `checker_name` and `identity_hash` are optional because older analyzers
/// omit them; every other key the analyzer writes is kept in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Primary location of the finding.
    pub location: Location,
    /// Ordered execution path.
    #[serde(default)]
    pub path: Vec<PathStep>,
    /// Name of the checker that produced the finding.
    #[serde(rename = "check_name", default, skip_serializing_if = "Option::is_none")]
    pub checker_name: Option<String>,
    /// Stable identity hash, if the analyzer produced one.
    #[serde(
        rename = "issue_hash_content_of_line_in_context",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub identity_hash: Option<String>,
    /// Short description of the finding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unrecognized keys, preserved for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Diagnostic {
    /// Bundle key holding the identity hash.
    pub const IDENTITY_HASH_KEY: &'static str = "issue_hash_content_of_line_in_context";

    /// Returns the file-table index of the primary location.
    pub fn primary_file(&self) -> FileIndex {
        self.location.file
    }
}

/// Where a record's identity hash came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashOrigin {
    /// The hash was present in the bundle and is trusted as-is.
    Source,
    /// The hash was computed by the content hasher; the bundle is dirty.
    Derived,
}

/// A diagnostic with its checker name and identity hash resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagnosticRecord {
    /// Resolved checker name (`"unknown"` when the bundle had none).
    pub checker_name: String,
    /// Resolved identity hash.
    pub identity_hash: String,
    /// Whether the hash was read or derived.
    pub hash_origin: HashOrigin,
    /// Primary location of the finding.
    pub location: Location,
    /// Short description of the finding.
    pub description: Option<String>,
    /// Ordered execution path.
    pub path: Vec<PathStep>,
    /// Every other key from the bundle diagnostic.
    pub extra: Map<String, Value>,
}

impl DiagnosticRecord {
    /// Returns the file-table index of the primary location.
    pub fn primary_file(&self) -> FileIndex {
        self.location.file
    }

    /// Returns the last event step that has a location, falling back to the
    /// last located step of any kind.
    pub fn last_event(&self) -> Option<&PathStep> {
        let located = || self.path.iter().rev().filter(|s| s.location.is_some());
        located()
            .find(|s| s.is_event())
            .or_else(|| located().next())
    }

    /// Returns the deepest (last) path step, if it has a location.
    pub fn last_step(&self) -> Option<&PathStep> {
        self.path.last().filter(|s| s.location.is_some())
    }

    /// Returns the event steps in path order.
    pub fn events(&self) -> impl Iterator<Item = &PathStep> {
        self.path.iter().filter(|s| s.is_event())
    }
}
