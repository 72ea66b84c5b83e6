// src/core/corpus.rs
use crate::config::Config;
use crate::core::filter::Filter;
use crate::core::index::TextIndex;
use crate::core::parser::{ParsedNote, read_note};
use crate::core::resolver::{LinkGraph, Resolver};
use crate::core::scanner::scan_notes;
use crate::core::scorer::{self, Importance};
use crate::error::{CorpusError, ParseError, QueryError};
use crate::models::{
    Diagnostic, LinkEdge, LinkSummary, Note, NoteId, OutboundLink, QueryResult, ResultDocument,
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// An in-memory snapshot of a notes directory: notes, link graph, importance scores and
/// text index, all built from the same note set.
#[derive(Debug)]
pub struct Corpus {
    config: Config,
    root: PathBuf,
    notes: BTreeMap<NoteId, Note>,
    resolver: Resolver,
    graph: LinkGraph,
    importance: Importance,
    index: TextIndex,
    diagnostics: Vec<Diagnostic>,
}

impl Corpus {
    /// Scans, parses and analyses the directory named by `config`.
    ///
    /// Files that fail to parse are left out and reported through
    /// [`Corpus::diagnostics`].
    ///
    /// # Errors
    ///
    /// This function may return an error if:
    /// * The notes directory is missing, not a directory or unreadable
    /// * The ignore file is invalid
    pub fn load(config: &Config) -> Result<Self, CorpusError> {
        let started = Instant::now();
        let scan = scan_notes(&config.directory, &config.scan.exclude)?;

        let parsed: Vec<Result<ParsedNote, ParseError>> = scan
            .files
            .par_iter()
            .map(|path| read_note(&scan.root, path))
            .collect();

        let mut diagnostics = scan.skipped;
        let mut notes = Vec::with_capacity(parsed.len());
        for result in parsed {
            match result {
                Ok(parsed) => {
                    for key in parsed.dropped_attributes {
                        tracing::debug!(
                            note = %parsed.note.id,
                            key = %key,
                            "dropped nested attribute"
                        );
                        diagnostics.push(Diagnostic::DroppedAttribute {
                            note: parsed.note.id.clone(),
                            key,
                        });
                    }
                    notes.push(parsed.note);
                }
                Err(err) => {
                    let reason = error_chain(&err);
                    tracing::warn!(
                        path = %err.path().display(),
                        reason = %reason,
                        "skipping note"
                    );
                    diagnostics.push(Diagnostic::SkippedFile {
                        path: err.path().to_path_buf(),
                        reason,
                    });
                }
            }
        }

        let corpus = Self::from_notes(config.clone(), scan.root, notes, diagnostics);
        tracing::info!(
            directory = %corpus.root.display(),
            notes = corpus.notes.len(),
            edges = corpus.graph.edges().len(),
            unresolved = corpus.graph.unresolved().len(),
            skipped = corpus
                .diagnostics
                .iter()
                .filter(|d| matches!(d, Diagnostic::SkippedFile { .. }))
                .count(),
            elapsed = ?started.elapsed(),
            "loaded corpus"
        );
        Ok(corpus)
    }

    /// Builds the graph, importance scores and index over notes that are already parsed.
    #[must_use]
    pub fn from_notes(
        config: Config,
        root: PathBuf,
        notes: impl IntoIterator<Item = Note>,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let notes: BTreeMap<NoteId, Note> = notes
            .into_iter()
            .map(|note| (note.id.clone(), note))
            .collect();

        let resolver = Resolver::new(&notes);
        let graph = LinkGraph::build(&notes, &resolver);
        diagnostics.extend(graph.unresolved().iter().map(|link| Diagnostic::UnresolvedLink {
            source: link.source.clone(),
            target: link.target.clone(),
            line: link.line,
        }));

        let (importance, index) = rayon::join(
            || scorer::compute(notes.keys(), &graph.arcs(), &config.scorer),
            || TextIndex::build(&notes, &config.index),
        );
        if !importance.converged {
            diagnostics.push(Diagnostic::NonConvergence {
                iterations: importance.iterations,
                delta: importance.delta,
            });
        }

        Self {
            config,
            root,
            notes,
            resolver,
            graph,
            importance,
            index,
            diagnostics,
        }
    }

    /// Ranked search. `filters` are attribute expressions that must all hold.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] when a filter expression is malformed. A query that
    /// matches nothing is an empty list.
    pub fn search<S: AsRef<str>>(
        &self,
        text: &str,
        filters: &[S],
    ) -> Result<Vec<QueryResult>, QueryError> {
        let filter = Filter::parse_all(filters)?;
        Ok(self.search_with(text, &filter))
    }

    /// Ranked search with a parsed filter.
    ///
    /// Candidates are the notes passing `filter`. When `text` has tokens, only candidates
    /// with a positive text score (and every quoted phrase) remain, and the combined score
    /// is `w * text / max_text + (1 - w) * importance / max_importance`. A blank `text`
    /// ranks by normalised importance alone. Text made only of punctuation matches nothing.
    #[must_use]
    pub fn search_with(&self, text: &str, filter: &Filter) -> Vec<QueryResult> {
        let query = self.index.parse_query(text);
        if query.is_empty() && !text.trim().is_empty() {
            return Vec::new();
        }
        let candidates = self.notes.values().filter(|note| filter.matches(note));
        let max_importance = self.importance.max();
        let importance_norm = |id: &NoteId| {
            let importance = self.importance.get(id.as_str());
            if max_importance > 0.0 {
                importance / max_importance
            } else {
                0.0
            }
        };

        let mut results: Vec<QueryResult> = if query.is_empty() {
            candidates
                .map(|note| QueryResult {
                    document: ResultDocument::from(note),
                    text_score: 0.0,
                    importance_score: self.importance.get(note.id.as_str()),
                    combined_score: importance_norm(&note.id),
                })
                .collect()
        } else {
            let text_scores = self.index.score(&query);
            let matched: Vec<(&Note, f64)> = candidates
                .filter_map(|note| text_scores.get(&note.id).map(|&score| (note, score)))
                .collect();
            let max_text = matched.iter().map(|&(_, score)| score).fold(0.0, f64::max);
            let weight = self.text_weight();

            matched
                .into_iter()
                .map(|(note, text_score)| {
                    let text_norm = if max_text > 0.0 {
                        text_score / max_text
                    } else {
                        0.0
                    };
                    QueryResult {
                        document: ResultDocument::from(note),
                        text_score,
                        importance_score: self.importance.get(note.id.as_str()),
                        combined_score: weight
                            .mul_add(text_norm, (1.0 - weight) * importance_norm(&note.id)),
                    }
                })
                .collect()
        };

        results.sort_by(QueryResult::rank_order);
        results
    }

    /// Attribute-only query, ranked by importance.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] when a filter expression is malformed.
    pub fn query<S: AsRef<str>>(&self, filters: &[S]) -> Result<Vec<QueryResult>, QueryError> {
        self.search("", filters)
    }

    fn text_weight(&self) -> f64 {
        let weight = self.config.search.text_weight;
        if weight.is_nan() {
            crate::config::SearchConfig::default().text_weight
        } else {
            weight.clamp(0.0, 1.0)
        }
    }

    /// Finds the note a token names: an id, a path, a title, an alias or a file name.
    #[must_use]
    pub fn resolve_note(&self, token: &str) -> Option<NoteId> {
        if self.notes.contains_key(token) {
            return Some(NoteId::new(token));
        }
        self.resolver.resolve_token(token)
    }

    /// Distinct notes linking to `note`, in id order. Unknown notes have no backlinks.
    #[must_use]
    pub fn backlinks(&self, note: &str) -> Vec<NoteId> {
        self.resolve_note(note)
            .map(|id| self.graph.backlinks(id.as_str()))
            .unwrap_or_default()
    }

    /// Every link occurrence pointing at `note`.
    #[must_use]
    pub fn backlink_edges(&self, note: &str) -> Vec<&LinkEdge> {
        self.resolve_note(note)
            .map(|id| self.graph.backlink_edges(id.as_str()))
            .unwrap_or_default()
    }

    /// Outbound links as written, with their resolution, and inbound notes. An unknown
    /// note yields an empty summary.
    #[must_use]
    pub fn lookup_links(&self, note: &str) -> LinkSummary {
        let Some(id) = self.resolve_note(note) else {
            return LinkSummary {
                note: NoteId::new(note),
                outbound: Vec::new(),
                inbound: Vec::new(),
            };
        };

        let outbound = self.notes.get(&id).map_or_else(Vec::new, |source| {
            source
                .outbound_links
                .iter()
                .zip(self.graph.resolutions(id.as_str()))
                .map(|(link, resolved)| OutboundLink {
                    target: link.target.clone(),
                    kind: link.kind,
                    line: link.line,
                    resolved: resolved.clone(),
                })
                .collect()
        });

        LinkSummary {
            inbound: self.graph.backlinks(id.as_str()),
            outbound,
            note: id,
        }
    }

    #[must_use]
    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    /// Notes in id order.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    #[must_use]
    pub const fn importance(&self) -> &Importance {
        &self.importance
    }

    #[must_use]
    pub const fn graph(&self) -> &LinkGraph {
        &self.graph
    }

    #[must_use]
    pub const fn index(&self) -> &TextIndex {
        &self.index
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

/// `error: cause: cause` on one line.
fn error_chain(err: &ParseError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
