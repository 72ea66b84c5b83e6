// src/core/index/tokenizer.rs
use rust_stemmers::{Algorithm, Stemmer};
use std::fmt;

/// Splits text into index terms: lowercase runs of alphanumeric characters, optionally
/// reduced to their English stem. Notes and queries go through the same tokenizer so
/// their terms line up.
pub struct Tokenizer {
    stemmer: Option<Stemmer>,
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("stem", &self.stemmer.is_some())
            .finish()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Tokenizer {
    #[must_use]
    pub fn new(stem: bool) -> Self {
        Self {
            stemmer: stem.then(|| Stemmer::create(Algorithm::English)),
        }
    }

    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(|word| {
                let word = word.to_lowercase();
                match &self.stemmer {
                    Some(stemmer) => stemmer.stem(&word).into_owned(),
                    None => word,
                }
            })
            .collect()
    }
}
