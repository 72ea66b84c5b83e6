// src/utils.rs
use crate::core::corpus::Corpus;
use crate::error::CorpusError;
use crate::models::{Diagnostic, LinkSummary, NoteId, QueryResult, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// `dir` made absolute against the current directory.
///
/// # Errors
///
/// Returns [`CorpusError::DirectoryUnreadable`] when `dir` is relative and the current
/// directory cannot be determined.
pub fn absolute_dir(dir: &Path) -> Result<PathBuf, CorpusError> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = env::current_dir().map_err(|source| CorpusError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(dir))
}

/// Corpus-wide counts, or one note in detail.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Inspection {
    Corpus {
        directory: PathBuf,
        notes: usize,
        edges: usize,
        unresolved_links: usize,
        terms: usize,
        iterations: usize,
        converged: bool,
        diagnostics: Vec<Diagnostic>,
    },
    Note {
        id: NoteId,
        path: PathBuf,
        title: String,
        metadata: BTreeMap<String, Value>,
        importance: f64,
        outbound_links: usize,
        backlinks: Vec<NoteId>,
    },
}

impl Inspection {
    #[must_use]
    pub fn corpus(corpus: &Corpus) -> Self {
        Self::Corpus {
            directory: corpus.root().to_path_buf(),
            notes: corpus.len(),
            edges: corpus.graph().edges().len(),
            unresolved_links: corpus.graph().unresolved().len(),
            terms: corpus.index().term_count(),
            iterations: corpus.importance().iterations,
            converged: corpus.importance().converged,
            diagnostics: corpus.diagnostics().to_vec(),
        }
    }

    /// `None` when no note matches `token`.
    #[must_use]
    pub fn note(corpus: &Corpus, token: &str) -> Option<Self> {
        let id = corpus.resolve_note(token)?;
        let note = corpus.note(id.as_str())?;
        Some(Self::Note {
            path: note.path.clone(),
            title: note.title.clone(),
            metadata: note.display_metadata(),
            importance: corpus.importance().get(id.as_str()),
            outbound_links: note.outbound_links.len(),
            backlinks: corpus.backlinks(id.as_str()),
            id,
        })
    }
}

/// Fixed-width result table, best match first.
#[must_use]
pub fn format_results(results: &[QueryResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>8} {:>8} {:>10}  {:<32} PATH",
        "SCORE", "TEXT", "IMPORTANCE", "TITLE"
    );
    for result in results {
        let _ = writeln!(
            out,
            "{:>8.4} {:>8.3} {:>10.5}  {:<32} {}",
            result.combined_score,
            result.text_score,
            result.importance_score,
            truncate(&result.document.title(), 32),
            result.document.id
        );
    }
    out
}

#[must_use]
pub fn format_note_ids(ids: &[NoteId]) -> String {
    ids.iter().fold(String::new(), |mut out, id| {
        let _ = writeln!(out, "{id}");
        out
    })
}

#[must_use]
pub fn format_links(summary: &LinkSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", summary.note);
    let _ = writeln!(out, "outbound ({}):", summary.outbound.len());
    for link in &summary.outbound {
        let resolved = link
            .resolved
            .as_ref()
            .map_or_else(|| "(unresolved)".to_owned(), ToString::to_string);
        let _ = writeln!(out, "  {:>5}  {:<32} -> {resolved}", link.line, link.target);
    }
    let _ = writeln!(out, "inbound ({}):", summary.inbound.len());
    for id in &summary.inbound {
        let _ = writeln!(out, "  {id}");
    }
    out
}

#[must_use]
pub fn format_inspection(inspection: &Inspection) -> String {
    let mut out = String::new();
    match inspection {
        Inspection::Corpus {
            directory,
            notes,
            edges,
            unresolved_links,
            terms,
            iterations,
            converged,
            diagnostics,
        } => {
            let _ = writeln!(out, "{:<18} {}", "Directory:", directory.display());
            let _ = writeln!(out, "{:<18} {notes}", "Notes:");
            let _ = writeln!(out, "{:<18} {edges}", "Links:");
            let _ = writeln!(out, "{:<18} {unresolved_links}", "Unresolved links:");
            let _ = writeln!(out, "{:<18} {terms}", "Index terms:");
            let state = if *converged { "converged" } else { "not converged" };
            let _ = writeln!(out, "{:<18} {iterations} iterations, {state}", "Importance:");
            for diagnostic in diagnostics {
                let _ = writeln!(out, "  {diagnostic}");
            }
        }
        Inspection::Note {
            id,
            path,
            title,
            metadata,
            importance,
            outbound_links,
            backlinks,
        } => {
            let _ = writeln!(out, "{:<12} {id}", "Id:");
            let _ = writeln!(out, "{:<12} {}", "Path:", path.display());
            let _ = writeln!(out, "{:<12} {title}", "Title:");
            let _ = writeln!(out, "{:<12} {importance:.6}", "Importance:");
            let _ = writeln!(out, "{:<12} {outbound_links}", "Links out:");
            let _ = writeln!(out, "{:<12} {}", "Links in:", backlinks.len());
            for (key, value) in metadata {
                let _ = writeln!(out, "  {key}: {value}");
            }
        }
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
