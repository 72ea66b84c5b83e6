// src/core/index.rs
pub mod tokenizer;

use crate::config::IndexConfig;
use crate::models::{Note, NoteId};
use std::collections::{BTreeMap, HashMap};
pub use tokenizer::Tokenizer;

/// Occurrences of one term in one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub note: NoteId,
    pub term_frequency: usize,
    /// Token positions, ascending. The body starts one position after the title.
    pub positions: Vec<usize>,
}

/// Tokens of a search string. Quoted parts also have to appear as consecutive tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery {
    pub terms: Vec<String>,
    pub phrases: Vec<Vec<String>>,
}

impl TextQuery {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Inverted index over note titles and bodies with BM25 relevance.
#[derive(Debug, Default)]
pub struct TextIndex {
    tokenizer: Tokenizer,
    k1: f64,
    b: f64,
    /// Postings are ordered by note id.
    postings: HashMap<String, Vec<Posting>>,
    lengths: BTreeMap<NoteId, usize>,
    average_length: f64,
}

impl TextIndex {
    #[must_use]
    pub fn build(notes: &BTreeMap<NoteId, Note>, config: &IndexConfig) -> Self {
        let tokenizer = Tokenizer::new(config.stem);
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut lengths = BTreeMap::new();

        for (id, note) in notes {
            let title = tokenizer.tokenize(&note.title);
            let body = tokenizer.tokenize(&note.text);
            let body_start = title.len() + 1;

            let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
            let numbered = title
                .into_iter()
                .enumerate()
                .chain(body.into_iter().enumerate().map(|(i, t)| (body_start + i, t)));
            let mut length = 0;
            for (position, term) in numbered {
                positions.entry(term).or_default().push(position);
                length += 1;
            }
            lengths.insert(id.clone(), length);

            for (term, positions) in positions {
                postings.entry(term).or_default().push(Posting {
                    note: id.clone(),
                    term_frequency: positions.len(),
                    positions,
                });
            }
        }

        let average_length = if lengths.is_empty() {
            0.0
        } else {
            lengths.values().sum::<usize>() as f64 / lengths.len() as f64
        };
        tracing::debug!(
            terms = postings.len(),
            notes = lengths.len(),
            "built text index"
        );

        Self {
            tokenizer,
            k1: config.k1,
            b: config.b,
            postings,
            lengths,
            average_length,
        }
    }

    /// Tokenizes a search string. A `"` without a partner is read as plain text.
    #[must_use]
    pub fn parse_query(&self, text: &str) -> TextQuery {
        let mut query = TextQuery::default();
        let parts: Vec<&str> = text.split('"').collect();
        let closed = parts.len() % 2 == 1;

        for (i, part) in parts.iter().enumerate() {
            let tokens = self.tokenizer.tokenize(part);
            let quoted = i % 2 == 1 && (closed || i + 1 < parts.len());
            if quoted && !tokens.is_empty() {
                query.phrases.push(tokens.clone());
            }
            query.terms.extend(tokens);
        }
        query
    }

    #[must_use]
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    #[must_use]
    pub fn document_count(&self) -> usize {
        self.lengths.len()
    }

    /// BM25 score of every note matching the query. Notes without a matching term, or
    /// missing one of the phrases, are absent.
    #[must_use]
    pub fn score(&self, query: &TextQuery) -> BTreeMap<NoteId, f64> {
        let mut scores: BTreeMap<NoteId, f64> = BTreeMap::new();
        let mut terms: Vec<&String> = query.terms.iter().collect();
        terms.sort();
        terms.dedup();

        let total = self.lengths.len() as f64;
        let average_length = if self.average_length > 0.0 {
            self.average_length
        } else {
            1.0
        };

        for term in terms {
            let postings = self.postings(term);
            if postings.is_empty() {
                continue;
            }
            let matching = postings.len() as f64;
            let idf = ((total - matching + 0.5) / (matching + 0.5) + 1.0).ln();

            for posting in postings {
                let (tf, length) = (
                    posting.term_frequency as f64,
                    self.lengths.get(&posting.note).copied().unwrap_or(0) as f64,
                );
                let norm = self.k1 * (1.0 - self.b + self.b * length / average_length);
                *scores.entry(posting.note.clone()).or_insert(0.0) +=
                    idf * tf * (self.k1 + 1.0) / (tf + norm);
            }
        }

        scores.retain(|id, score| {
            *score > 0.0 && query.phrases.iter().all(|phrase| self.contains_phrase(id, phrase))
        });
        scores
    }

    /// Whether the tokens of `phrase` occur at consecutive positions in note `id`.
    #[must_use]
    pub fn contains_phrase(&self, id: &NoteId, phrase: &[String]) -> bool {
        let Some((first, rest)) = phrase.split_first() else {
            return true;
        };
        let Some(starts) = self.positions(first, id) else {
            return false;
        };
        let rest: Option<Vec<&[usize]>> = rest.iter().map(|term| self.positions(term, id)).collect();
        let Some(rest) = rest else {
            return false;
        };

        starts.iter().any(|&start| {
            rest.iter()
                .enumerate()
                .all(|(offset, positions)| positions.binary_search(&(start + offset + 1)).is_ok())
        })
    }

    fn positions(&self, term: &str, id: &NoteId) -> Option<&[usize]> {
        let postings = self.postings(term);
        postings
            .binary_search_by(|posting| posting.note.cmp(id))
            .ok()
            .map(|i| postings[i].positions.as_slice())
    }
}
