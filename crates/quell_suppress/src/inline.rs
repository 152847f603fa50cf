//! Inline suppression markers in source comments.
//!
//! ```text
//! // quell_suppress [core.DivideZero, deadcode.DeadStores] checked by caller
//! int x = 1 / y;
//! ```
//!
//! The bracket list names checkers, identity hashes, or `all`. Text after the
//! closing bracket is the suppression comment. A marker applies to the line
//! it trails, or to the first non-comment line below the comment block that
//! contains it.

use std::path::Path;

use quell_common::basename;
use quell_source::{SourceDb, SourceFile};

/// The marker keyword recognized in comments.
pub const SUPPRESS_MARKER: &str = "quell_suppress";

/// Bracket entry that matches every checker.
const ALL_CHECKERS: &str = "all";

/// A suppression requested by a source comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineSuppression {
    /// Identity hash of the suppressed finding.
    pub hash: String,
    /// Basename of the source file.
    pub file_name: String,
    /// Text following the bracket list, possibly empty.
    pub comment: String,
}

/// A parsed marker: the bracket targets and the trailing comment.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Marker {
    targets: Vec<String>,
    comment: String,
}

impl Marker {
    fn applies_to(&self, hash: &str, checker_name: &str) -> bool {
        self.targets
            .iter()
            .any(|t| t == ALL_CHECKERS || t == checker_name || t == hash)
    }
}

/// Which comment syntax a source file uses, chosen from its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CommentStyle {
    /// `//` line comments and `/* */` blocks. `#` lines are directives.
    Slashes,
    /// `#` line comments only.
    Hash,
    /// Unknown language: any of the above.
    Any,
}

impl CommentStyle {
    fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "c" | "h" | "cc" | "cpp" | "cxx" | "c++" | "hh" | "hpp" | "hxx" | "inl" | "m"
            | "mm" | "cu" | "cuh" | "java" | "js" | "jsx" | "ts" | "tsx" | "go" | "rs"
            | "swift" | "kt" | "cs" | "scala" | "dart" => Self::Slashes,
            "py" | "pyi" | "sh" | "bash" | "rb" | "pl" | "pm" | "r" | "cmake" | "yml"
            | "yaml" | "toml" | "mk" => Self::Hash,
            _ => Self::Any,
        }
    }

    fn slashes(self) -> bool {
        self != Self::Hash
    }

    fn hash(self) -> bool {
        self != Self::Slashes
    }

    /// Whether the text before a marker puts it inside a comment.
    fn opens_comment(self, before: &str) -> bool {
        (self.slashes() && (before.contains("//") || before.contains("/*")))
            || (self.hash() && before.contains('#'))
    }

    /// Classifies one line given whether it starts inside a block comment.
    /// Returns whether the line holds nothing but comments, and whether a
    /// block comment is still open at its end.
    fn classify(self, line: &str, mut in_block: bool) -> (bool, bool) {
        let mut rest = line.trim();
        let mut seen_comment = false;
        loop {
            if in_block {
                seen_comment = true;
                match rest.find("*/") {
                    Some(end) => {
                        in_block = false;
                        rest = rest[end + 2..].trim_start();
                    }
                    None => return (true, true),
                }
            } else if rest.is_empty() {
                return (seen_comment, false);
            } else if (self.slashes() && rest.starts_with("//"))
                || (self.hash() && rest.starts_with('#'))
            {
                return (true, false);
            } else if self.slashes() && rest.starts_with("/*") {
                in_block = true;
                rest = &rest[2..];
            } else {
                return (false, self.slashes() && leaves_block_open(rest));
            }
        }
    }
}

/// Whether a code line ends inside a `/*` it opened.
fn leaves_block_open(code: &str) -> bool {
    let code = code.find("//").map_or(code, |i| &code[..i]);
    match (code.rfind("/*"), code.rfind("*/")) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

/// A source line with its comment context.
#[derive(Clone, Copy, Debug)]
struct ScannedLine<'a> {
    text: &'a str,
    starts_in_block: bool,
    comment_only: bool,
}

/// Looks for a marker covering `line` of `file` that names `checker_name`,
/// `hash`, or `all`.
///
/// The reported line is checked first (a trailing comment), then the
/// contiguous comment-only lines directly above it, nearest first. An
/// unreadable file or out-of-range line yields `None`.
pub fn detect_inline_suppression(
    sources: &mut SourceDb,
    file: &Path,
    line: u32,
    hash: &str,
    checker_name: &str,
) -> Option<InlineSuppression> {
    let style = CommentStyle::for_path(file);
    let source = sources.file(file)?;
    let marker = candidate_lines(source, line, style)
        .into_iter()
        .filter_map(|l| parse_marker(l.text, l.starts_in_block, style))
        .find(|m| m.applies_to(hash, checker_name))?;

    let file_name = basename(&file.to_string_lossy()).to_string();
    tracing::debug!("inline suppression of {hash} found in {file_name}:{line}");
    Some(InlineSuppression {
        hash: hash.to_string(),
        file_name,
        comment: marker.comment,
    })
}

/// The reported line followed by the comment block above it, nearest first.
///
/// Block-comment state is tracked from the top of the file, so a `*` line
/// only counts as a comment inside an open `/* */`.
fn candidate_lines(source: &SourceFile, line: u32, style: CommentStyle) -> Vec<ScannedLine<'_>> {
    if line == 0 || line as usize > source.line_count() {
        return Vec::new();
    }

    let mut scanned = Vec::with_capacity(line as usize);
    let mut in_block = false;
    for n in 1..=line {
        let text = source.line(n).unwrap_or_default();
        let (comment_only, open_after) = style.classify(text, in_block);
        scanned.push(ScannedLine {
            text,
            starts_in_block: in_block,
            comment_only,
        });
        in_block = open_after;
    }

    let Some(reported) = scanned.pop() else {
        return Vec::new();
    };
    let mut candidates = vec![reported];
    candidates.extend(scanned.into_iter().rev().take_while(|l| l.comment_only));
    candidates
}

/// Parses a marker out of one line, if the line carries one inside a
/// comment.
fn parse_marker(line: &str, starts_in_block: bool, style: CommentStyle) -> Option<Marker> {
    let pos = line.find(SUPPRESS_MARKER)?;
    if !starts_in_block && !style.opens_comment(&line[..pos]) {
        return None;
    }

    let rest = line[pos + SUPPRESS_MARKER.len()..].trim_start();
    let rest = rest.strip_prefix('[')?;
    let close = rest.find(']')?;
    let targets: Vec<String> = rest[..close]
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if targets.is_empty() {
        return None;
    }

    let comment = rest[close + 1..].trim();
    let comment = comment.strip_suffix("*/").unwrap_or(comment).trim();
    Some(Marker {
        targets,
        comment: comment.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "3cfa1d2b";
    const CHECKER: &str = "core.DivideZero";

    fn detect(source: &str, line: u32) -> Option<InlineSuppression> {
        detect_in("/src/proj/main.c", source, line)
    }

    fn detect_in(path: &str, source: &str, line: u32) -> Option<InlineSuppression> {
        let mut db = SourceDb::new();
        db.add_source(path, source.to_string());
        detect_inline_suppression(&mut db, Path::new(path), line, HASH, CHECKER)
    }

    #[test]
    fn marker_above_line() {
        let src = "int y = 0;\n// quell_suppress [core.DivideZero] y is never zero here\nint x = 1 / y;\n";
        let found = detect(src, 3).unwrap();
        assert_eq!(found.hash, HASH);
        assert_eq!(found.file_name, "main.c");
        assert_eq!(found.comment, "y is never zero here");
    }

    #[test]
    fn trailing_marker_on_reported_line() {
        let src = "int x = 1 / y; /* quell_suppress [all] legacy */\n";
        let found = detect(src, 1).unwrap();
        assert_eq!(found.comment, "legacy");
    }

    #[test]
    fn marker_by_hash_in_comment_block() {
        let src = "// quell_suppress [3cfa1d2b]\n// more explanation\nint x = 1 / y;\n";
        let found = detect(src, 3).unwrap();
        assert_eq!(found.comment, "");
    }

    #[test]
    fn other_checker_does_not_match() {
        let src = "// quell_suppress [deadcode.DeadStores] nope\nint x = 1 / y;\n";
        assert!(detect(src, 2).is_none());
    }

    #[test]
    fn code_line_breaks_the_block() {
        let src = "// quell_suppress [all]\nint y = 0;\nint x = 1 / y;\n";
        assert!(detect(src, 3).is_none());
    }

    #[test]
    fn marker_outside_comment_is_ignored() {
        let src = "char *s = \"quell_suppress [all]\"; int x = 1 / y;\n";
        assert!(detect(src, 1).is_none());
    }

    #[test]
    fn hash_comment_syntax() {
        let src = "# quell_suppress [core.DivideZero, other.Check] generated\nx = 1 / y\n";
        assert_eq!(detect_in("/src/proj/gen.py", src, 2).unwrap().comment, "generated");
        assert!(detect(src, 2).is_none());
    }

    #[test]
    fn pointer_dereference_breaks_the_block() {
        let src = "{\n// quell_suppress [core.DivideZero] p checked\n*p = 1;\n*q = 2 / y;\n}\n";
        assert!(detect(src, 4).is_none());
        assert_eq!(detect(src, 3).unwrap().comment, "p checked");
    }

    #[test]
    fn preprocessor_line_breaks_the_block() {
        let src = "// quell_suppress [all]\n#define DIV(a, b) ((a) / (b))\nint x = DIV(1, y);\n";
        assert!(detect(src, 3).is_none());
        assert!(detect_in("/src/proj/unknown.txt", src, 3).is_some());
    }

    #[test]
    fn marker_inside_block_comment() {
        let src = "/*\n * quell_suppress [core.DivideZero] audited\n */\nint x = 1 / y;\n";
        assert_eq!(detect(src, 4).unwrap().comment, "audited");
    }

    #[test]
    fn star_line_after_closed_block_is_code() {
        let src = "/* quell_suppress [all] */\n*p = 0;\nint x = 1 / y;\n";
        assert!(detect(src, 3).is_none());
    }

    #[test]
    fn classify_tracks_block_state() {
        let c = CommentStyle::Slashes;
        assert_eq!(c.classify("/* open", false), (true, true));
        assert_eq!(c.classify(" * middle", true), (true, true));
        assert_eq!(c.classify(" */", true), (true, false));
        assert_eq!(c.classify("*p = 1;", false), (false, false));
        assert_eq!(c.classify("int a; /* trailing", false), (false, true));
        assert_eq!(c.classify("#include <stdio.h>", false), (false, false));
        assert_eq!(CommentStyle::Hash.classify("# note", false), (true, false));
        assert_eq!(CommentStyle::Hash.classify("// not python", false), (false, false));
    }

    #[test]
    fn unreadable_file_or_line() {
        let mut db = SourceDb::new();
        assert!(detect_inline_suppression(
            &mut db,
            Path::new("/nonexistent/quell/x.c"),
            1,
            HASH,
            CHECKER
        )
        .is_none());
        assert!(detect("int x;\n", 40).is_none());
    }

    #[test]
    fn empty_bracket_is_not_a_marker() {
        let any = CommentStyle::Any;
        assert!(parse_marker("// quell_suppress [] why", false, any).is_none());
        assert!(parse_marker("// quell_suppress no brackets", false, any).is_none());
    }
}
