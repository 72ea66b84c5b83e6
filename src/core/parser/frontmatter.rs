// src/core/parser/frontmatter.rs
use crate::error::ParseError;
use crate::models::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// A note's text cut at the end of its frontmatter block.
#[derive(Debug, PartialEq, Eq)]
pub struct Split<'a> {
    /// YAML between the delimiters, `None` when the note has no block.
    pub frontmatter: Option<&'a str>,
    pub body: &'a str,
    /// 1-based line of the file the body starts on.
    pub body_line: usize,
}

/// Decoded frontmatter plus the keys that had to be left out.
#[derive(Debug, Default)]
pub struct Metadata {
    pub attributes: BTreeMap<String, Value>,
    pub dropped: Vec<String>,
}

/// Separates a leading `---` block from the body. The block ends at the next line that is
/// exactly `---` or `...`.
///
/// # Errors
///
/// Returns [`ParseError::UnterminatedFrontmatter`] when the opening delimiter is never
/// closed.
pub fn split_frontmatter<'a>(content: &'a str, path: &Path) -> Result<Split<'a>, ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let first_end = content.find('\n').map_or(content.len(), |i| i + 1);
    if content[..first_end].trim_end() != "---" {
        return Ok(Split {
            frontmatter: None,
            body: content,
            body_line: 1,
        });
    }

    let mut offset = first_end;
    let mut line_number = 1;
    while offset < content.len() {
        line_number += 1;
        let line_end = content[offset..]
            .find('\n')
            .map_or(content.len(), |i| offset + i + 1);
        let line = content[offset..line_end].trim_end();
        if line == "---" || line == "..." {
            return Ok(Split {
                frontmatter: Some(&content[first_end..offset]),
                body: &content[line_end..],
                body_line: line_number + 1,
            });
        }
        offset = line_end;
    }

    Err(ParseError::UnterminatedFrontmatter {
        path: path.to_path_buf(),
    })
}

/// Decodes a frontmatter block into attributes. Empty blocks yield no attributes.
///
/// # Errors
///
/// This function may return an error if:
/// * The block is not valid YAML
/// * The YAML root is not a mapping
pub fn parse_metadata(yaml: &str, path: &Path) -> Result<Metadata, ParseError> {
    let mut metadata = Metadata::default();
    if yaml.trim().is_empty() {
        return Ok(metadata);
    }

    let root: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(yaml).map_err(|source| ParseError::InvalidFrontmatter {
            path: path.to_path_buf(),
            source,
        })?;

    let mapping = match root {
        serde_yaml_ng::Value::Mapping(mapping) => mapping,
        serde_yaml_ng::Value::Null => return Ok(metadata),
        _ => {
            return Err(ParseError::FrontmatterNotMapping {
                path: path.to_path_buf(),
            });
        }
    };

    for (key, value) in mapping {
        let Some(key) = Value::key_from_yaml(&key) else {
            metadata.dropped.push(format!("{key:?}"));
            continue;
        };
        match Value::from_yaml(value) {
            Some(value) => {
                metadata.attributes.insert(key, value);
            }
            None => metadata.dropped.push(key),
        }
    }

    Ok(metadata)
}
