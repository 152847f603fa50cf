//! Whole-file rewrite helper for bundles and suppression files.

use std::fs::OpenOptions;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Rewrites the existing file at `path` in place.
///
/// The file is opened once for reading and writing, its current content is
/// passed to `update`, and the returned content replaces it: seek to the
/// start, write, then truncate to the new length. The handle is dropped on
/// every exit path. A missing file is an error.
///
/// This is not atomic. A crash between the write and the truncate can leave
/// a corrupt file, and concurrent writers are not coordinated; exactly one
/// process is expected to own the file for the duration of a run.
pub fn rewrite_in_place<F>(path: &Path, update: F) -> io::Result<()>
where
    F: FnOnce(&str) -> String,
{
    rewrite(path, false, update)
}

/// Like [`rewrite_in_place`], but a missing file is created and `update`
/// sees empty content.
pub fn rewrite_or_create<F>(path: &Path, update: F) -> io::Result<()>
where
    F: FnOnce(&str) -> String,
{
    rewrite(path, true, update)
}

fn rewrite<F>(path: &Path, create: bool, update: F) -> io::Result<()>
where
    F: FnOnce(&str) -> String,
{
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(create)
        .truncate(false)
        .open(path)?;
    let mut current = String::new();
    file.read_to_string(&mut current)?;

    let updated = update(&current);

    file.seek(SeekFrom::Start(0))?;
    file.write_all(updated.as_bytes())?;
    file.set_len(updated.len() as u64)?;
    file.flush()
}
