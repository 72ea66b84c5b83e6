// src/core/ignore/loader.rs
use crate::core::ignore::Patterns;
use crate::error::IgnoreError;
use std::fs;
use std::path::Path;

/// Name of the ignore file.
pub const IGNORE_FILE: &str = ".zksignore";

/// Loads ignore patterns from the nearest `.zksignore`, starting in `dir` and walking up
/// through its parents. No file means no patterns.
///
/// # Errors
///
/// This function may return an error if:
/// * The `.zksignore` file exists but cannot be read
/// * The file contains invalid pattern syntax
#[inline]
pub fn load_ignore_patterns(dir: &Path) -> Result<Patterns, IgnoreError> {
    let mut patterns = Patterns::new();

    let Some(ignore_file) = dir
        .ancestors()
        .map(|ancestor| ancestor.join(IGNORE_FILE))
        .find(|candidate| candidate.is_file())
    else {
        return Ok(patterns);
    };

    let content = fs::read_to_string(&ignore_file).map_err(|source| IgnoreError::Read {
        path: ignore_file.clone(),
        source,
    })?;
    for line in content.lines() {
        patterns.add_pattern(line)?;
    }

    tracing::debug!(file = %ignore_file.display(), "loaded ignore patterns");
    Ok(patterns)
}
