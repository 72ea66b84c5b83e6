// src/config.rs
use crate::error::CorpusError;
use crate::utils::absolute_dir;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the optional settings file looked up in the notes directory and its parents.
pub const CONFIG_FILE: &str = ".zks.toml";

/// Everything one invocation needs to know about a corpus. The directory is always carried
/// explicitly so several corpora can be loaded side by side.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[serde(skip)]
    pub directory: PathBuf,
    pub scan: ScanConfig,
    pub scorer: ScorerConfig,
    pub index: IndexConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directory names skipped during the walk.
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMethod {
    PageRank,
    Katz,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScorerConfig {
    pub method: ScoringMethod,
    /// PageRank damping factor.
    pub damping: f64,
    /// Katz attenuation factor.
    pub alpha: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    pub k1: f64,
    pub b: f64,
    /// Reduce terms to their English stem before indexing and querying.
    pub stem: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Share of the combined score given to text relevance, the rest goes to importance.
    pub text_weight: f64,
    /// Results printed by the command line. The library returns every match.
    pub limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: vec![".git".to_owned()],
        }
    }
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            method: ScoringMethod::PageRank,
            damping: 0.85,
            alpha: 0.1,
            tolerance: 1e-10,
            max_iterations: 1000,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
            stem: false,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            text_weight: 0.7,
            limit: 10,
        }
    }
}

impl Config {
    /// Default settings for `directory`, ignoring any settings file.
    #[must_use]
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            scan: ScanConfig::default(),
            scorer: ScorerConfig::default(),
            index: IndexConfig::default(),
            search: SearchConfig::default(),
        }
    }

    /// Settings for `directory`, read from the nearest `.zks.toml` in it or one of its
    /// parents. Falls back to defaults when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The current directory is needed to resolve a relative path and cannot be read
    /// * A settings file exists but cannot be read or is not valid TOML for these settings
    pub fn load(directory: &Path) -> Result<Self, CorpusError> {
        let absolute = absolute_dir(directory)?;

        let Some(file) = find_config_file(&absolute) else {
            return Ok(Self::new(directory.to_path_buf()));
        };

        let content = fs::read_to_string(&file).map_err(|source| CorpusError::DirectoryUnreadable {
            path: file.clone(),
            source,
        })?;
        let mut config = Self::parse(&content).map_err(|source| CorpusError::Config {
            path: file.clone(),
            source: Box::new(source),
        })?;
        config.directory = directory.to_path_buf();

        tracing::debug!(file = %file.display(), "loaded settings");
        Ok(config)
    }

    /// Parses settings text. The directory is left at its default.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when the text is malformed or names unknown settings.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

fn find_config_file(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|ancestor| ancestor.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}
