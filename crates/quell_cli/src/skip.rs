//! `quell skip` — strip findings in excluded files from bundles.

use std::path::Path;

use quell_config::SkipList;
use quell_report::skip_reports_in_file;

use crate::settings::Settings;
use crate::{GlobalArgs, SkipArgs};

/// Runs the `quell skip` command.
///
/// Returns exit code 1 if any bundle could not be rewritten, 0 otherwise.
pub fn run(args: &SkipArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = Settings::load(global)?;
    let skip_list = settings.skip_list(&args.skip)?;
    if skip_list.is_empty() {
        tracing::warn!("no skip patterns configured, bundles left unchanged");
        return Ok(0);
    }
    Ok(filter_bundles(&args.bundles, &skip_list, global.quiet))
}

fn filter_bundles(bundles: &[String], skip_list: &SkipList, quiet: bool) -> i32 {
    let mut code = 0;
    for bundle in bundles {
        match skip_reports_in_file(Path::new(bundle), skip_list) {
            Ok(()) => {
                if !quiet {
                    eprintln!("    Filtered {bundle}");
                }
            }
            Err(e) => {
                tracing::error!("{e}");
                code = 1;
            }
        }
    }
    code
}
