// src/error.rs
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures that abort loading a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("notes directory `{}` does not exist", .path.display())]
    DirectoryMissing { path: PathBuf },
    #[error("`{}` is not a directory", .path.display())]
    NotADirectory { path: PathBuf },
    #[error("notes directory `{}` cannot be read", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to walk the notes directory")]
    Walk(#[from] walkdir::Error),
    #[error("invalid configuration file `{}`", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
    #[error("invalid ignore file")]
    Ignore(#[from] IgnoreError),
}

#[derive(Debug, Error)]
pub enum IgnoreError {
    #[error("failed to read ignore file `{}`", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("invalid pattern `{pattern}`: unbalanced braces")]
    UnbalancedBraces { pattern: String },
}

/// Failures confined to one file. The file is left out and loading continues.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read `{}`", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("`{}` is not valid UTF-8", .path.display())]
    NotUtf8 { path: PathBuf },
    #[error("the frontmatter of `{}` is never closed", .path.display())]
    UnterminatedFrontmatter { path: PathBuf },
    #[error("the frontmatter of `{}` is not valid YAML", .path.display())]
    InvalidFrontmatter {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
    #[error("the frontmatter of `{}` is not a mapping", .path.display())]
    FrontmatterNotMapping { path: PathBuf },
}

impl ParseError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::NotUtf8 { path }
            | Self::UnterminatedFrontmatter { path }
            | Self::InvalidFrontmatter { path, .. }
            | Self::FrontmatterNotMapping { path } => path,
        }
    }
}

/// Invalid attribute filter. Distinct from a query that simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("empty filter expression")]
    Empty,
    #[error("filter `{0}` has no attribute name")]
    MissingKey(String),
    #[error("filter `{0}` has no comparison operator")]
    MissingOperator(String),
    #[error("filter `{0}` has no value")]
    MissingValue(String),
    #[error("filter `{input}` has an invalid value: {reason}")]
    InvalidValue { input: String, reason: String },
    #[error("filter `{0}` compares a range against a list")]
    RangeOverList(String),
    #[error("unterminated quote in `{0}`")]
    UnterminatedQuote(String),
    #[error("unbalanced parentheses in `{0}`")]
    UnbalancedParentheses(String),
    #[error("unexpected `{token}` in `{input}`")]
    UnexpectedToken { input: String, token: String },
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("note `{}` already exists", .path.display())]
    AlreadyExists { path: PathBuf },
    #[error("failed to read template `{}`", .path.display())]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write note `{}`", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("note path `{0}` is empty or leaves the notes directory")]
    InvalidPath(String),
    #[error("failed to format today's date")]
    Date(#[from] time::error::Format),
}

/// Failure of a one-shot search: the corpus could not be loaded or a filter is invalid.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),
    #[error(transparent)]
    Query(#[from] QueryError),
}
