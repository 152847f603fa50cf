//! `quell suppress` — manage the suppression file.

use std::io::Write;
use std::path::PathBuf;

use quell_suppress::SuppressionStore;

use crate::settings::Settings;
use crate::{GlobalArgs, SuppressAction, SuppressArgs};

/// Runs the `quell suppress` command.
pub fn run(args: &SuppressArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = Settings::load(global)?;
    let file = settings
        .suppress_file(args.suppress.as_deref())
        .ok_or("no suppression file given; pass --suppress or set suppress.file in quell.toml")?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    apply(&args.action, file, &mut out)
}

fn apply(
    action: &SuppressAction,
    file: PathBuf,
    out: &mut dyn Write,
) -> Result<i32, Box<dyn std::error::Error>> {
    match action {
        SuppressAction::Add {
            hash,
            file: reported,
            comment,
        } => {
            let mut store = SuppressionStore::new(Some(file), true)?;
            store.add(hash, reported, comment)?;
        }
        SuppressAction::Remove {
            hash,
            file: reported,
        } => {
            let mut store = SuppressionStore::new(Some(file), true)?;
            store.remove(hash, reported)?;
        }
        SuppressAction::List => {
            let store = SuppressionStore::new(Some(file), false)?;
            for record in store.records() {
                writeln!(out, "{}  {}  {}", record.hash, record.file_name, record.comment)?;
            }
        }
    }
    Ok(0)
}
