// src/models/diagnostic.rs
use crate::models::NoteId;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Something noteworthy that happened while loading a corpus without stopping it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A file was excluded from the note set.
    SkippedFile { path: PathBuf, reason: String },
    /// A frontmatter attribute could not be represented and was left out.
    DroppedAttribute { note: NoteId, key: String },
    UnresolvedLink { source: NoteId, target: String, line: usize },
    /// The importance iteration stopped at its cap (or on a non-finite iterate).
    NonConvergence { iterations: usize, delta: f64 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedFile { path, reason } => {
                write!(f, "skipped {}: {reason}", path.display())
            }
            Self::DroppedAttribute { note, key } => {
                write!(f, "{note}: attribute `{key}` is a nested mapping and was dropped")
            }
            Self::UnresolvedLink { source, target, line } => {
                write!(f, "{source}:{line}: unresolved link `{target}`")
            }
            Self::NonConvergence { iterations, delta } => write!(
                f,
                "importance did not converge after {iterations} iterations (last change {delta:e})"
            ),
        }
    }
}
