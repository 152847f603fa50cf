//! The text formatter and correlator.

use std::io::Write;
use std::path::Path;

use quell_common::basename;
use quell_report::{BundleParser, DiagnosticRecord, Location, SkipPolicy};
use quell_source::FileTable;
use quell_suppress::{detect_inline_suppression, SuppressionStore};

use crate::error::ReportError;
use crate::severity::SeverityMap;
use crate::stats::ReportStats;

/// Renders findings as text and accumulates [`ReportStats`].
///
/// Each finding goes through, in order: the skip policy (by display file),
/// the suppression store (by hash and display file basename), and inline
/// suppression markers at the finding's last path step. Only findings that
/// pass all three are rendered and counted.
///
/// ```text
/// [HIGH] main.c:3:12: Division by zero [core.DivideZero]
///   return 1 / y;
///            ^
/// ```
pub struct Formatter {
    /// Checker name to severity label.
    severity_map: SeverityMap,

    /// Optional exclusion by display file.
    skip_policy: Option<Box<dyn SkipPolicy>>,

    /// Optional persisted suppressions; also receives inline promotions.
    suppressions: Option<SuppressionStore>,

    /// Whether event steps are listed under each finding.
    print_steps: bool,

    /// Parser used by `parse_and_write`; also owns the source cache and the
    /// source root used for line lookups.
    parser: BundleParser,
}

impl Formatter {
    /// Creates a formatter with no skip policy and no suppression store.
    pub fn new(severity_map: SeverityMap) -> Self {
        Self {
            severity_map,
            skip_policy: None,
            suppressions: None,
            print_steps: false,
            parser: BundleParser::new(),
        }
    }

    /// Sets the exclusion policy.
    pub fn with_skip_policy(mut self, policy: impl SkipPolicy + 'static) -> Self {
        self.skip_policy = Some(Box::new(policy));
        self
    }

    /// Sets the suppression store.
    pub fn with_suppressions(mut self, store: SuppressionStore) -> Self {
        self.suppressions = Some(store);
        self
    }

    /// Replaces the bundle parser.
    pub fn with_parser(mut self, parser: BundleParser) -> Self {
        self.parser = parser;
        self
    }

    /// Returns whether event steps are listed under each finding.
    pub fn print_steps(&self) -> bool {
        self.print_steps
    }

    /// Sets whether event steps are listed under each finding.
    pub fn set_print_steps(&mut self, value: bool) {
        self.print_steps = value;
    }

    /// Returns the suppression store, if one is configured.
    pub fn suppressions(&self) -> Option<&SuppressionStore> {
        self.suppressions.as_ref()
    }

    /// Parses the bundle at `bundle_path` and renders its findings to `out`.
    ///
    /// A bundle that cannot be read at all yields
    /// [`ReportError::InvalidBundle`] and writes nothing.
    pub fn parse_and_write(
        &mut self,
        bundle_path: &Path,
        analyzed_file: Option<&str>,
        out: &mut dyn Write,
    ) -> Result<ReportStats, ReportError> {
        let parsed = self.parser.parse_file(bundle_path);
        if let Some(source) = parsed.failure {
            tracing::error!("the generated bundle {} is not valid", bundle_path.display());
            return Err(ReportError::InvalidBundle {
                path: bundle_path.to_path_buf(),
                source,
            });
        }
        let stats = self.write_reports(out, &parsed.files, &parsed.diagnostics, analyzed_file)?;
        Ok(stats)
    }

    /// Renders `records` to `out`, followed by the summary line.
    ///
    /// Statistics start from zero on every call.
    pub fn write_reports(
        &mut self,
        out: &mut dyn Write,
        files: &FileTable,
        records: &[DiagnosticRecord],
        analyzed_file: Option<&str>,
    ) -> std::io::Result<ReportStats> {
        let mut stats = ReportStats::default();

        for record in records {
            let Some(display_file) = display_file(files, record) else {
                tracing::warn!(
                    "report {} points outside the file table, skipping",
                    record.identity_hash
                );
                continue;
            };

            if self
                .skip_policy
                .as_ref()
                .is_some_and(|p| p.should_skip(display_file))
            {
                tracing::debug!("report {} is skipped (in {display_file})", record.identity_hash);
                continue;
            }

            if self
                .suppressions
                .as_ref()
                .is_some_and(|s| s.is_suppressed(&record.identity_hash, display_file))
            {
                tracing::debug!("report {} is suppressed by the suppression file", record.identity_hash);
                continue;
            }

            let (anchor, message) = anchor_of(record);
            let Some(anchor_entry) = files.get(anchor.file) else {
                continue;
            };

            if self.promote_inline_suppression(record, anchor_entry, anchor.line) {
                continue;
            }

            let severity = self.severity_map.severity_of(&record.checker_name).to_string();
            stats.record(&severity, display_file);

            let header = format_event(
                Some((severity.as_str(), record.checker_name.as_str())),
                anchor_entry,
                anchor,
                message,
            );
            writeln!(out, "{header}")?;
            if let Some(context) = self.format_location(anchor_entry, anchor) {
                writeln!(out, "{context}")?;
            }

            if self.print_steps {
                self.write_steps(out, files, record)?;
            }
            writeln!(out)?;
        }

        let suffix = analyzed_file
            .filter(|f| !f.is_empty())
            .map(|f| format!(" {}", basename(f)))
            .unwrap_or_default();
        match stats.report_count() {
            0 => writeln!(out, "Found no defects while analyzing{suffix}")?,
            n => write!(out, "Found {n} defect(s) while analyzing{suffix}\n\n")?,
        }

        Ok(stats)
    }

    /// Checks for an inline marker at the anchor and, if found, records it
    /// in the suppression store. Returns `true` if the report is suppressed.
    fn promote_inline_suppression(
        &mut self,
        record: &DiagnosticRecord,
        entry: &str,
        line: u32,
    ) -> bool {
        let source_path = self.parser.resolve_source_path(entry);
        let Some(found) = detect_inline_suppression(
            self.parser.sources_mut(),
            &source_path,
            line,
            &record.identity_hash,
            &record.checker_name,
        ) else {
            return false;
        };

        if let Some(store) = self.suppressions.as_mut() {
            if let Err(e) = store.add(&found.hash, &found.file_name, &found.comment) {
                tracing::error!("failed to store inline suppression of {}: {e}", found.hash);
            }
        }
        tracing::debug!("report {} is suppressed in source", record.identity_hash);
        true
    }

    fn write_steps(
        &mut self,
        out: &mut dyn Write,
        files: &FileTable,
        record: &DiagnosticRecord,
    ) -> std::io::Result<()> {
        writeln!(out, "  Report hash: {}", record.identity_hash)?;
        writeln!(out, "  Steps:")?;

        let events: Vec<(&Location, &str)> = record
            .events()
            .filter_map(|s| Some((s.location.as_ref()?, s.message.as_deref().unwrap_or(""))))
            .collect();
        let width = events.len().to_string().len();
        for (idx, (loc, message)) in events.into_iter().enumerate() {
            let Some(entry) = files.get(loc.file) else {
                continue;
            };
            let step = format_event(None, entry, loc, message);
            writeln!(out, "    {:>width$}, {step}", idx + 1)?;
            if let Some(context) = self.format_location(entry, loc) {
                writeln!(out, "{context}")?;
            }
        }
        Ok(())
    }

    /// The source line at `loc` with a caret under its column, or `None` if
    /// the line cannot be read.
    fn format_location(&mut self, entry: &str, loc: &Location) -> Option<String> {
        let source_path = self.parser.resolve_source_path(entry);
        let line = self.parser.sources_mut().line(&source_path, loc.line)?;
        Some(caret_block(line, loc.col))
    }
}

/// The file-table entry of the record's last event, falling back to its
/// last located step and then to its own location.
fn display_file<'a>(files: &'a FileTable, record: &DiagnosticRecord) -> Option<&'a str> {
    let file = record
        .last_event()
        .and_then(|s| s.location.as_ref())
        .map_or(record.location.file, |l| l.file);
    files.get(file)
}

/// The location and message the header is printed for: the last path step,
/// or the diagnostic itself when the path does not end in a located step.
fn anchor_of(record: &DiagnosticRecord) -> (&Location, &str) {
    let description = record.description.as_deref().unwrap_or("");
    match record.last_step().or_else(|| record.last_event()) {
        Some(step) => {
            let loc = step.location.as_ref().unwrap_or(&record.location);
            (loc, step.message.as_deref().unwrap_or(description))
        }
        None => (&record.location, description),
    }
}

/// `[severity] file:line:col: message [checker]`, or `file:line:col: message`
/// without decoration.
fn format_event(
    decoration: Option<(&str, &str)>,
    entry: &str,
    loc: &Location,
    message: &str,
) -> String {
    let place = format!("{}:{}:{}: {message}", basename(entry), loc.line, loc.col);
    match decoration {
        Some((severity, checker)) => format!("[{severity}] {place} [{checker}]"),
        None => place,
    }
}

/// Two lines: `line` with tabs widened to two spaces, then a caret under
/// column `col`.
fn caret_block(line: &str, col: u32) -> String {
    let prefix: String = line.chars().take((col as usize).saturating_sub(1)).collect();
    let tabs = prefix.matches('\t').count();
    let padding = " ".repeat(prefix.chars().count() + tabs);
    format!("{}\n{padding}^", line.replace('\t', "  "))
}
