// src/core/parser.rs
pub mod frontmatter;
pub mod markdown;

use crate::error::ParseError;
use crate::models::{Note, NoteId, Value};
use frontmatter::{parse_metadata, split_frontmatter};
use markdown::read_body;
use std::fs;
use std::path::Path;

/// A parsed note and the frontmatter keys that could not be kept.
#[derive(Debug)]
pub struct ParsedNote {
    pub note: Note,
    pub dropped_attributes: Vec<String>,
}

/// Reads and parses one note file.
///
/// # Errors
///
/// This function may return an error if:
/// * The file cannot be read
/// * The file is not UTF-8
/// * The frontmatter block is unterminated, invalid YAML or not a mapping
pub fn read_note(root: &Path, path: &Path) -> Result<ParsedNote, ParseError> {
    let bytes = fs::read(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_note(root, path, &bytes)
}

/// Parses the bytes of the note at `path`, a file under `root`.
///
/// Notes without frontmatter are valid: they get no attributes and a title taken from the
/// file name.
///
/// # Errors
///
/// This function may return an error if:
/// * The content is not UTF-8
/// * The frontmatter block is unterminated, invalid YAML or not a mapping
pub fn parse_note(root: &Path, path: &Path, bytes: &[u8]) -> Result<ParsedNote, ParseError> {
    let content = std::str::from_utf8(bytes).map_err(|_| ParseError::NotUtf8 {
        path: path.to_path_buf(),
    })?;

    let split = split_frontmatter(content, path)?;
    let metadata = match split.frontmatter {
        Some(yaml) => parse_metadata(yaml, path)?,
        None => frontmatter::Metadata::default(),
    };

    let id = NoteId::from_relative(path.strip_prefix(root).unwrap_or(path));
    let title = derive_title(&metadata.attributes, &id);
    let body = read_body(split.body, split.body_line);

    Ok(ParsedNote {
        note: Note {
            id,
            path: path.to_path_buf(),
            title,
            metadata: metadata.attributes,
            body: split.body.to_owned(),
            text: body.text,
            outbound_links: body.links,
        },
        dropped_attributes: metadata.dropped,
    })
}

/// The `title` attribute when it is a non-empty scalar, the file stem otherwise.
fn derive_title(attributes: &std::collections::BTreeMap<String, Value>, id: &NoteId) -> String {
    match attributes.get("title") {
        Some(value) if !value.is_list() => {
            let title = value.to_string();
            let title = title.trim();
            if title.is_empty() {
                id.stem().to_owned()
            } else {
                title.to_owned()
            }
        }
        _ => id.stem().to_owned(),
    }
}
