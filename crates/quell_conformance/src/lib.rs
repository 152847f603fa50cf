//! Conformance test helpers for Quell.
//!
//! Provides builders for bundle documents and an on-disk [`Fixture`] that
//! lays out source files, bundles, and suppression files, plus a helper that
//! runs the formatter over a bundle and captures its text output. Log
//! output of a closure can be captured with [`capture_logs`].

#![warn(missing_docs)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use quell_render::{Formatter, ReportError, ReportStats};
use serde_json::{json, Value};
use tracing_subscriber::fmt::MakeWriter;

/// A directory holding the files of one test scenario.
pub struct Fixture {
    root: PathBuf,
}

impl Fixture {
    /// Uses `root` (normally a temporary directory) as the scenario root.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Returns the scenario root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `content` to `name` under the root and returns its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Writes a bundle document as pretty JSON.
    pub fn bundle(&self, name: &str, doc: &Value) -> PathBuf {
        self.write(name, &serde_json::to_string_pretty(doc).unwrap())
    }

    /// Reads a file under the root back as JSON.
    pub fn read_json(&self, path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }
}

/// A location object.
pub fn location(file: usize, line: u32, col: u32) -> Value {
    json!({"line": line, "col": col, "file": file})
}

/// An event path step.
pub fn event(file: usize, line: u32, col: u32, message: &str) -> Value {
    json!({"kind": "event", "location": location(file, line, col), "message": message})
}

/// A diagnostic whose path is `path` and whose primary location is the last
/// step's location. `checker` and `hash` are omitted when `None`.
pub fn diagnostic(path: Vec<Value>, checker: Option<&str>, hash: Option<&str>) -> Value {
    let primary = path
        .iter()
        .rev()
        .find_map(|s| s.get("location").cloned())
        .unwrap_or_else(|| location(0, 1, 1));
    let description = path
        .last()
        .and_then(|s| s.get("message").cloned())
        .unwrap_or(Value::Null);
    let mut diag = json!({
        "location": primary,
        "description": description,
        "category": "Logic error",
        "path": path,
    });
    if let Some(c) = checker {
        diag["check_name"] = json!(c);
    }
    if let Some(h) = hash {
        diag["issue_hash_content_of_line_in_context"] = json!(h);
    }
    diag
}

/// A bundle document over `files` with `diagnostics`.
pub fn bundle(files: &[&str], diagnostics: Vec<Value>) -> Value {
    json!({
        "files": files,
        "diagnostics": diagnostics,
        "metadata": {"analyzer": {"name": "clangsa"}},
    })
}

/// Runs `formatter` over the bundle at `path`, returning the rendered text
/// and the result.
pub fn render(
    formatter: &mut Formatter,
    path: &Path,
    analyzed_file: Option<&str>,
) -> (String, Result<ReportStats, ReportError>) {
    let mut out = Vec::new();
    let result = formatter.parse_and_write(path, analyzed_file, &mut out);
    (String::from_utf8(out).unwrap(), result)
}

/// Sum of a statistics map's values.
pub fn total(map: &std::collections::BTreeMap<String, usize>) -> usize {
    map.values().sum()
}

/// Shared buffer that log lines are formatted into.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a thread-local subscriber and returns its result along with
/// every log line it emitted, without ANSI colors.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (value, logs)
}
