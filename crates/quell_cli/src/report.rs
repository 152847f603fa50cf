//! `quell report` — render findings from bundles.
//!
//! 1. Load configuration (`quell.toml`, overridden by flags)
//! 2. Build the severity map, skip list, and suppression store
//! 3. Parse each bundle, enriching and rewriting it when hashes were missing
//! 4. Render surviving findings and accumulate statistics

use std::io::Write;
use std::path::{Path, PathBuf};

use quell_render::{Formatter, ReportError, ReportStats, SeverityMap};
use quell_report::BundleParser;
use quell_suppress::SuppressionStore;

use crate::settings::Settings;
use crate::{GlobalArgs, ReportArgs, ReportFormat};

/// Runs the `quell report` command.
///
/// Returns exit code 1 if any bundle could not be parsed, 0 otherwise.
pub fn run(args: &ReportArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = Settings::load(global)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_output(args, &settings, &mut out)
}

/// Runs the report against `out`. Text findings go to `out`; with
/// `--format json` only the aggregated statistics are written.
pub fn run_with_output(
    args: &ReportArgs,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<i32, Box<dyn std::error::Error>> {
    let mut formatter = build_formatter(args, settings)?;

    let mut totals = ReportStats::default();
    let mut failed = 0usize;
    for bundle in &args.bundles {
        let mut discard = std::io::sink();
        let target: &mut dyn Write = match args.format {
            ReportFormat::Text => &mut *out,
            ReportFormat::Json => &mut discard,
        };
        match formatter.parse_and_write(Path::new(bundle), args.analyzed_file.as_deref(), target) {
            Ok(stats) => totals.merge(&stats),
            Err(ReportError::InvalidBundle { .. }) => failed += 1,
            Err(e) => return Err(e.into()),
        }
    }

    if args.format == ReportFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(&totals)?)?;
    }

    if failed > 0 {
        tracing::error!("{failed} of {} bundle(s) could not be parsed", args.bundles.len());
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Merges flags over configuration and assembles the formatter.
fn build_formatter(
    args: &ReportArgs,
    settings: &Settings,
) -> Result<Formatter, Box<dyn std::error::Error>> {
    let config = &settings.config;

    let mut severities: SeverityMap = config.severity.clone().into_iter().collect();
    if let Some(path) = &args.severity_map {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read severity map {path}: {e}"))?;
        let overrides = SeverityMap::from_json_str(&content)
            .map_err(|e| format!("invalid severity map {path}: {e}"))?;
        severities.extend(overrides);
    }

    let source_root = args
        .source_root
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| config.report.source_root.clone());
    let parser = BundleParser::new()
        .with_source_root(source_root)
        .allow_rewrite(config.report.allow_rewrite && !args.no_rewrite);

    let store = SuppressionStore::new(
        settings.suppress_file(args.suppress.as_deref()),
        args.writable || config.suppress.writable,
    )?;

    let mut formatter = Formatter::new(severities)
        .with_parser(parser)
        .with_suppressions(store);
    let skip_list = settings.skip_list(&args.skip)?;
    if !skip_list.is_empty() {
        formatter = formatter.with_skip_policy(skip_list);
    }
    formatter.set_print_steps(args.print_steps || config.report.print_steps);
    Ok(formatter)
}
