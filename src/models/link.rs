// src/models/link.rs
use crate::models::NoteId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// `[[target]]`, `[[target|label]]`
    Wiki,
    /// `[label](target.md)`
    Markdown,
}

/// A link token as written in a note body, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawLink {
    pub target: String,
    pub kind: LinkKind,
    /// 1-based line in the file.
    pub line: usize,
}

/// A link whose target is a note of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEdge {
    pub source: NoteId,
    pub target: NoteId,
    pub line: usize,
}

/// A link that matched no note. Kept so dangling references stay visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedLink {
    pub source: NoteId,
    pub target: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundLink {
    pub target: String,
    pub kind: LinkKind,
    pub line: usize,
    pub resolved: Option<NoteId>,
}

/// Links leaving and entering one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSummary {
    pub note: NoteId,
    pub outbound: Vec<OutboundLink>,
    pub inbound: Vec<NoteId>,
}
