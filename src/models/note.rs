// src/models/note.rs
use crate::models::{RawLink, Value};
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Stable identity of a note: its path relative to the corpus root, `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds an id from a path relative to the corpus root.
    #[must_use]
    pub fn from_relative(path: &Path) -> Self {
        let parts: Vec<String> = path
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Self(parts.join("/"))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name without the `.md` extension, in any case.
    #[must_use]
    pub fn stem(&self) -> &str {
        let name = self.0.rsplit('/').next().unwrap_or(&self.0);
        strip_markdown_extension(name)
    }

    /// Directory part of the id, empty for notes at the corpus root.
    #[must_use]
    pub fn parent(&self) -> &str {
        self.0.rsplit_once('/').map_or("", |(dir, _)| dir)
    }
}

/// `name` without a trailing `.md`, `.MD` or `.Md`.
pub(crate) fn strip_markdown_extension(name: &str) -> &str {
    name.len()
        .checked_sub(3)
        .filter(|&split| name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(".md"))
        .map_or(name, |split| &name[..split])
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NoteId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NoteId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// One parsed Markdown file. Immutable once the parser hands it over.
#[derive(Debug, Clone)]
pub struct Note {
    pub id: NoteId,
    pub path: PathBuf,
    pub title: String,
    pub metadata: BTreeMap<String, Value>,
    /// Raw Markdown after the frontmatter.
    pub body: String,
    /// Readable text of the body, the part that is searched.
    pub text: String,
    pub outbound_links: Vec<RawLink>,
}

impl Note {
    /// Alternative names declared in the `aliases` (or `alias`) attribute.
    #[must_use]
    pub fn aliases(&self) -> Vec<&str> {
        ["aliases", "alias"]
            .iter()
            .filter_map(|key| self.metadata.get(*key))
            .flat_map(|value| match value {
                Value::String(alias) => vec![alias.as_str()],
                Value::List(items) => items.iter().filter_map(Value::as_str).collect(),
                Value::Number(_) | Value::Boolean(_) => Vec::new(),
            })
            .collect()
    }

    /// Metadata as shown to consumers: always carries a `title`, falling back to the derived
    /// one when the frontmatter has none.
    #[must_use]
    pub fn display_metadata(&self) -> BTreeMap<String, Value> {
        let mut metadata = self.metadata.clone();
        metadata
            .entry("title".to_owned())
            .or_insert_with(|| Value::String(self.title.clone()));
        metadata
    }
}
