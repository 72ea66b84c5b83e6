// src/models.rs
mod diagnostic;
mod link;
mod note;
mod query_result;
mod value;

pub use diagnostic::Diagnostic;
pub use link::{LinkEdge, LinkKind, LinkSummary, OutboundLink, RawLink, UnresolvedLink};
pub use note::{Note, NoteId};
pub(crate) use note::strip_markdown_extension;
pub use query_result::{QueryResult, ResultDocument};
pub use value::Value;
