// src/models/query_result.rs
use crate::models::{Note, NoteId, Value};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The part of a note shown alongside its scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultDocument {
    pub id: NoteId,
    pub path: String,
    pub metadata: BTreeMap<String, Value>,
}

impl From<&Note> for ResultDocument {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            path: note.path.to_string_lossy().into_owned(),
            metadata: note.display_metadata(),
        }
    }
}

impl ResultDocument {
    /// The title attribute, always present in the metadata.
    #[must_use]
    pub fn title(&self) -> String {
        self.metadata
            .get("title")
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub document: ResultDocument,
    pub text_score: f64,
    pub importance_score: f64,
    pub combined_score: f64,
}

impl QueryResult {
    /// Result order: combined score descending, then note id ascending.
    #[must_use]
    pub fn rank_order(&self, other: &Self) -> Ordering {
        other
            .combined_score
            .total_cmp(&self.combined_score)
            .then_with(|| self.document.id.cmp(&other.document.id))
    }
}
