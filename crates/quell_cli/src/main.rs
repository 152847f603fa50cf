//! Quell CLI — triage of static-analysis diagnostic bundles.
//!
//! Provides `quell report` for rendering findings with suppression and
//! exclusion applied, `quell skip` for stripping excluded findings from
//! bundles in place, and `quell suppress` for managing the suppression file.

#![warn(missing_docs)]

mod report;
mod settings;
mod skip;
mod suppress;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Quell — correlate, suppress, and report static-analysis findings.
#[derive(Parser, Debug)]
#[command(name = "quell", version, about = "Static-analysis report triage")]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) log output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `quell.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the findings of one or more bundles.
    Report(ReportArgs),
    /// Remove findings in excluded files from bundles, in place.
    Skip(SkipArgs),
    /// Manage the suppression file.
    Suppress(SuppressArgs),
}

/// Arguments for the `quell report` subcommand.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Bundle files to render.
    #[arg(required = true)]
    pub bundles: Vec<String>,

    /// Directory file-table entries are resolved against.
    #[arg(long)]
    pub source_root: Option<String>,

    /// Do not write derived identity hashes back into bundles.
    #[arg(long)]
    pub no_rewrite: bool,

    /// List the event steps of every finding.
    #[arg(long)]
    pub print_steps: bool,

    /// Source file name shown in the summary line.
    #[arg(long)]
    pub analyzed_file: Option<String>,

    /// Suppression file to consult.
    #[arg(long)]
    pub suppress: Option<String>,

    /// Record inline suppression markers into the suppression file.
    #[arg(long)]
    pub writable: bool,

    /// JSON file mapping checker names to severities.
    #[arg(long)]
    pub severity_map: Option<String>,

    /// Skip pattern (`+glob` keeps, `-glob` excludes); replaces configured patterns.
    #[arg(long = "skip", allow_hyphen_values = true)]
    pub skip: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `quell skip` subcommand.
#[derive(Parser, Debug)]
pub struct SkipArgs {
    /// Bundle files to filter in place.
    #[arg(required = true)]
    pub bundles: Vec<String>,

    /// Skip pattern (`+glob` keeps, `-glob` excludes); replaces configured patterns.
    #[arg(long = "skip", allow_hyphen_values = true)]
    pub skip: Vec<String>,
}

/// Arguments for the `quell suppress` subcommand.
#[derive(Parser, Debug)]
pub struct SuppressArgs {
    /// Suppression file; defaults to the configured one.
    #[arg(long, global = true)]
    pub suppress: Option<String>,

    /// The action to perform.
    #[command(subcommand)]
    pub action: SuppressAction,
}

/// Suppression file actions.
#[derive(Subcommand, Debug)]
pub enum SuppressAction {
    /// Suppress a finding.
    Add {
        /// Identity hash of the finding.
        #[arg(long)]
        hash: String,
        /// File the finding is reported in; only its basename is stored.
        #[arg(long)]
        file: String,
        /// Reason for the suppression.
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Remove a suppression.
    Remove {
        /// Identity hash of the finding.
        #[arg(long)]
        hash: String,
        /// File the finding is reported in.
        #[arg(long)]
        file: String,
    },
    /// List all suppressions.
    List,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable findings and summary.
    Text,
    /// Aggregated statistics as JSON.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Report(ref args) => report::run(args, &global),
        Command::Skip(ref args) => skip::run(args, &global),
        Command::Suppress(ref args) => suppress::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over
/// `--quiet` and `--verbose`.
fn init_logging(quiet: bool, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_report_default() {
        let cli = Cli::parse_from(["quell", "report", "out/main.c.json"]);
        match cli.command {
            Command::Report(ref args) => {
                assert_eq!(args.bundles, vec!["out/main.c.json"]);
                assert!(!args.no_rewrite);
                assert!(!args.print_steps);
                assert!(!args.writable);
                assert!(args.skip.is_empty());
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Report command"),
        }
    }

    #[test]
    fn parse_report_with_args() {
        let cli = Cli::parse_from([
            "quell",
            "report",
            "a.json",
            "b.json",
            "--source-root",
            "/srv",
            "--no-rewrite",
            "--print-steps",
            "--analyzed-file",
            "src/main.c",
            "--suppress",
            "quell.suppress",
            "--writable",
            "--severity-map",
            "severities.json",
            "--skip",
            "-*/vendor/*",
            "--skip",
            "+*",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Report(ref args) => {
                assert_eq!(args.bundles, vec!["a.json", "b.json"]);
                assert_eq!(args.source_root.as_deref(), Some("/srv"));
                assert!(args.no_rewrite);
                assert!(args.print_steps);
                assert_eq!(args.analyzed_file.as_deref(), Some("src/main.c"));
                assert_eq!(args.suppress.as_deref(), Some("quell.suppress"));
                assert!(args.writable);
                assert_eq!(args.severity_map.as_deref(), Some("severities.json"));
                assert_eq!(args.skip, vec!["-*/vendor/*", "+*"]);
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Report command"),
        }
    }

    #[test]
    fn report_requires_bundle() {
        assert!(Cli::try_parse_from(["quell", "report"]).is_err());
    }

    #[test]
    fn parse_skip() {
        let cli = Cli::parse_from(["quell", "skip", "a.json", "--skip", "-*b.c"]);
        match cli.command {
            Command::Skip(ref args) => {
                assert_eq!(args.bundles, vec!["a.json"]);
                assert_eq!(args.skip, vec!["-*b.c"]);
            }
            _ => panic!("expected Skip command"),
        }
    }

    #[test]
    fn parse_suppress_add() {
        let cli = Cli::parse_from([
            "quell", "suppress", "add", "--hash", "abc", "--file", "/src/a.c", "--comment", "ok",
        ]);
        match cli.command {
            Command::Suppress(SuppressArgs {
                action: SuppressAction::Add { hash, file, comment },
                ..
            }) => {
                assert_eq!(hash, "abc");
                assert_eq!(file, "/src/a.c");
                assert_eq!(comment, "ok");
            }
            _ => panic!("expected Suppress Add command"),
        }
    }

    #[test]
    fn parse_suppress_list_with_file() {
        let cli = Cli::parse_from(["quell", "suppress", "list", "--suppress", "s.txt"]);
        match cli.command {
            Command::Suppress(ref args) => {
                assert!(matches!(args.action, SuppressAction::List));
                assert_eq!(args.suppress.as_deref(), Some("s.txt"));
            }
            _ => panic!("expected Suppress command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["quell", "--quiet", "--config", "/p/quell.toml", "suppress", "list"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("/p/quell.toml"));
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["quell", "skip", "a.json", "-v"]);
        assert!(cli.verbose);
    }
}
