// src/core/scanner.rs
pub mod utils;


use crate::core::ignore::load_ignore_patterns;
use crate::error::CorpusError;
use crate::models::Diagnostic;
use crate::utils::absolute_dir;
use std::fs;
use std::path::{Path, PathBuf};
use utils::{is_markdown, should_exclude};
use walkdir::WalkDir;

/// Markdown files found under a notes directory.
#[derive(Debug, Default)]
pub struct Scan {
    /// Absolute directory the walk started from.
    pub root: PathBuf,
    /// Note files, sorted.
    pub files: Vec<PathBuf>,
    /// Entries the walk could not visit.
    pub skipped: Vec<Diagnostic>,
}

/// Walks `dir` and collects every Markdown note that is not hidden, not inside one of
/// `exclude_dirs` and not matched by `.zksignore`.
///
/// # Arguments
///
/// * `dir` - The notes directory
/// * `exclude_dirs` - Directory names to leave out of the walk
///
/// # Errors
///
/// This function may return an error if:
/// * The directory does not exist, is not a directory or cannot be read
/// * The ignore patterns file cannot be read or parsed
pub fn scan_notes(dir: &Path, exclude_dirs: &[String]) -> Result<Scan, CorpusError> {
    let root = absolute_dir(dir)?;
    check_directory(&root)?;

    let ignore_patterns = load_ignore_patterns(&root)?;
    let mut scan = Scan {
        root: root.clone(),
        ..Scan::default()
    };

    for entry in WalkDir::new(&root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !should_exclude(e, &root, exclude_dirs, &ignore_patterns))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                scan.skipped.push(Diagnostic::SkippedFile {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            scan.files.push(entry.into_path());
        } else if entry.file_type().is_file() {
            tracing::trace!(path = %entry.path().display(), "not a note");
        }
    }

    scan.files.sort();
    Ok(scan)
}

fn check_directory(root: &Path) -> Result<(), CorpusError> {
    let metadata = fs::metadata(root).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            CorpusError::DirectoryMissing {
                path: root.to_path_buf(),
            }
        } else {
            CorpusError::DirectoryUnreadable {
                path: root.to_path_buf(),
                source,
            }
        }
    })?;
    if !metadata.is_dir() {
        return Err(CorpusError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    fs::read_dir(root).map_err(|source| CorpusError::DirectoryUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(())
}
