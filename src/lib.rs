// src/lib.rs
//! Search over a directory of Markdown notes, ranking matches by text relevance and by the
//! importance of each note in the link graph.
//!
//! ```no_run
//! # fn main() -> Result<(), zks::SearchError> {
//! let config = zks::Config::load(std::path::Path::new("notes"))?;
//! for result in zks::search(&config, "graph theory", &["status=draft"])? {
//!     println!("{:.3} {}", result.combined_score, result.document.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod template;
pub mod utils;

pub use cli::{Args, Command, run};
pub use config::Config;
pub use crate::core::corpus::Corpus;
pub use crate::core::filter::Filter;
pub use error::{CorpusError, IgnoreError, ParseError, QueryError, SearchError, TemplateError};
pub use models::{Diagnostic, LinkSummary, Note, NoteId, QueryResult, Value};
pub use template::create_note;

/// Loads the corpus named by `config` and runs one ranked search.
///
/// Filters are checked before the directory is read.
///
/// # Errors
///
/// Returns an error if a filter is malformed or the corpus cannot be loaded.
pub fn search<S: AsRef<str>>(
    config: &Config,
    text: &str,
    filters: &[S],
) -> Result<Vec<QueryResult>, SearchError> {
    let filter = Filter::parse_all(filters)?;
    let corpus = Corpus::load(config)?;
    Ok(corpus.search_with(text, &filter))
}

/// Loads the corpus named by `config` and reports the links of one note.
///
/// # Errors
///
/// Returns an error if the corpus cannot be loaded.
pub fn lookup_links(config: &Config, note: &str) -> Result<LinkSummary, CorpusError> {
    Ok(Corpus::load(config)?.lookup_links(note))
}
