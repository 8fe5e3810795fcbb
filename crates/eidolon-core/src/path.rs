#![forbid(unsafe_code)]

//! Relative-path string helpers.
//!
//! Store paths are `/`-separated relative strings everywhere in eidolon; these
//! helpers keep the stem/dir arithmetic in one tested place instead of spread
//! across the coordinator and the collector.

/// File stem of the last path segment: everything before the final `.`.
///
/// `"photos/cat.jpg"` → `"cat"`, `"archive.tar.gz"` → `"archive.tar"`,
/// `"noext"` → `"noext"`.
#[must_use]
pub fn stem_of(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Directory part of a relative path, `""` for top-level entries.
#[must_use]
pub fn rel_dir(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    }
}

/// Join a directory and a child name, treating `""` as the root.
#[must_use]
pub fn join_rel(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}
