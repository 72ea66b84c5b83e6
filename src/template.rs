// src/template.rs
use crate::error::TemplateError;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write as _};
use std::path::{Component, Path, PathBuf};
use time::OffsetDateTime;
use time::macros::format_description;

/// Template used when none is given: a frontmatter block with the title.
pub const DEFAULT_TEMPLATE: &str = "---\ntitle: \"{{title}}\"\ndate: {{date}}\n---\n\n";

/// Note text with `{{name}}` placeholders.
#[derive(Debug, Clone)]
pub struct Template {
    text: String,
    fields: BTreeMap<String, String>,
}

impl Template {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Replaces every known placeholder. Unknown ones are left as written.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                out.push_str(&rest[start..]);
                return out;
            };
            let name = after[..end].trim();
            match self.fields.get(name) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after[end + 2..];
        }

        out.push_str(rest);
        out
    }
}

/// Creates a note at `path` (relative to `directory`) from a template and returns where
/// it was written.
///
/// `.md` is appended when missing and parent directories are created. `title` (the file
/// stem) and `date` (today, UTC) are always available; entries of `vars` override them.
///
/// # Errors
///
/// This function may return an error if:
/// * `path` is empty, absolute or climbs out of `directory`
/// * A file already exists at the target
/// * The template cannot be read or the note cannot be written
pub fn create_note(
    directory: &Path,
    path: &str,
    template: Option<&Path>,
    vars: &BTreeMap<String, String>,
) -> Result<PathBuf, TemplateError> {
    let relative = note_path(path)?;
    let target = directory.join(&relative);

    let text = match template {
        Some(file) => fs::read_to_string(file).map_err(|source| TemplateError::ReadTemplate {
            path: file.to_path_buf(),
            source,
        })?,
        None => DEFAULT_TEMPLATE.to_owned(),
    };

    let mut template = Template::new(text);
    let title = relative
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    template.add_field("title", title);
    template.add_field("date", today()?);
    for (key, value) in vars {
        template.add_field(key.as_str(), value.as_str());
    }

    let write_error = |source| TemplateError::Write {
        path: target.clone(),
        source,
    };
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
        .map_err(|source| {
            if source.kind() == ErrorKind::AlreadyExists {
                TemplateError::AlreadyExists {
                    path: target.clone(),
                }
            } else {
                write_error(source)
            }
        })?;
    file.write_all(template.render().as_bytes())
        .map_err(write_error)?;

    tracing::info!(path = %target.display(), "created note");
    Ok(target)
}

/// Validates a user-supplied note path and gives it the `.md` extension.
fn note_path(path: &str) -> Result<PathBuf, TemplateError> {
    let invalid = || TemplateError::InvalidPath(path.to_owned());
    let mut relative = PathBuf::new();
    for component in Path::new(path.trim()).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(invalid());
            }
        }
    }
    if relative.as_os_str().is_empty() {
        return Err(invalid());
    }

    let is_markdown = relative
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
    if !is_markdown {
        let mut name = relative.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".md");
        relative.set_file_name(name);
    }
    Ok(relative)
}

fn today() -> Result<String, TemplateError> {
    let format = format_description!("[year]-[month]-[day]");
    Ok(OffsetDateTime::now_utc().date().format(&format)?)
}
