//! Path helpers shared by suppression matching and report rendering.

/// Returns the final component of a `/`- or `\`-separated path.
///
/// Suppression records are matched on this value only, so a finding
/// suppressed in `/build/a/src/x.c` stays suppressed in `/ci/src/x.c`.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}
