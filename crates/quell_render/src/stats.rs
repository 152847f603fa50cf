//! Statistics accumulated over one rendering pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Counts of rendered findings by severity, by file, and in total.
///
/// Encoded as `{"severity": {..}, "files": {..}, "reports": {"report_count": N}}`.
/// Excluded and suppressed findings never contribute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStats {
    /// Rendered findings per severity label.
    pub severity: BTreeMap<String, usize>,
    /// Rendered findings per display file path.
    pub files: BTreeMap<String, usize>,
    /// Aggregate counters.
    pub reports: ReportTotals,
}

/// Aggregate counters of a [`ReportStats`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTotals {
    /// Total number of rendered findings.
    pub report_count: usize,
}

impl ReportStats {
    /// Counts one rendered finding.
    pub fn record(&mut self, severity: &str, file: &str) {
        *self.severity.entry(severity.to_string()).or_default() += 1;
        *self.files.entry(file.to_string()).or_default() += 1;
        self.reports.report_count += 1;
    }

    /// Returns the total number of rendered findings.
    pub fn report_count(&self) -> usize {
        self.reports.report_count
    }

    /// Adds the counts of `other` into `self`.
    pub fn merge(&mut self, other: &ReportStats) {
        for (severity, n) in &other.severity {
            *self.severity.entry(severity.clone()).or_default() += n;
        }
        for (file, n) in &other.files {
            *self.files.entry(file.clone()).or_default() += n;
        }
        self.reports.report_count += other.reports.report_count;
    }
}
