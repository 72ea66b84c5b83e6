// src/core/scanner/utils.rs
use crate::core::ignore::Patterns;
use std::ffi::OsStr;
use std::path::Path;

/// Determines if a directory entry should be left out of the corpus:
/// - hidden files and directories
/// - directories named in `exclude_dirs`
/// - paths matched by the ignore patterns, relative to `root`
///
/// The walk root itself is never excluded.
pub fn should_exclude(
    entry: &walkdir::DirEntry,
    root: &Path,
    exclude_dirs: &[String],
    ignore_patterns: &Patterns,
) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    if is_hidden(entry) {
        return true;
    }

    if entry.file_type().is_dir() {
        let name = entry.file_name().to_string_lossy();
        if exclude_dirs.iter().any(|dir| *dir == name) {
            return true;
        }
    }

    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    ignore_patterns.matches(relative)
}

pub fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

/// Notes are files with an `.md` extension, in any case.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}
