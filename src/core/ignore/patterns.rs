// src/core/ignore/patterns.rs
use crate::error::IgnoreError;
use glob::Pattern;
use std::path::Path;

#[derive(Debug)]
struct Rule {
    pattern: Pattern,
    /// `!pattern`: re-includes paths an earlier rule ignored.
    negated: bool,
    /// `/pattern`: only matches relative to the corpus root.
    anchored: bool,
}

impl Rule {
    fn applies_to(&self, path_str: &str, filename: &str) -> bool {
        let simple_anchored = self.anchored && !self.pattern.as_str().contains('/');
        if simple_anchored && path_str.contains('/') {
            return false;
        }
        self.pattern.matches(path_str) || self.pattern.matches(filename)
    }
}

/// Gitignore-style rules read from `.zksignore`, matched against paths relative to the
/// notes directory.
#[derive(Debug, Default)]
pub struct Patterns {
    rules: Vec<Rule>,
}

impl Patterns {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Adds one line of an ignore file.
    ///
    /// Understands:
    /// - Comments (`#`) and blank lines, which are skipped
    /// - Negation with a `!` prefix
    /// - Directory patterns ending with `/`
    /// - Brace groups like `*.{tmp,bak}`
    /// - Patterns anchored to the root with a leading `/`
    /// - Bare file names, matched at any depth
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The pattern contains invalid glob syntax
    /// * A brace group is not closed
    pub fn add_pattern(&mut self, line: &str) -> Result<(), IgnoreError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let (line, negated) = line
            .strip_prefix('!')
            .map_or((line, false), |stripped| (stripped, true));
        let anchored = line.starts_with('/');
        let body = line.strip_prefix('/').unwrap_or(line);

        let has_wildcard = body.contains(['*', '?', '[']);
        let bare_filename = !has_wildcard && !body.contains(['/', '\\']);

        let mut glob_pattern = if has_wildcard {
            body.replace("**", "[GLOBSTAR]")
        } else if body.ends_with('/') {
            if negated {
                format!("**/{body}**/*")
            } else {
                format!("**/{body}**")
            }
        } else if negated || body.contains('.') || bare_filename {
            body.to_owned()
        } else {
            format!("{body}/**")
        };
        if !anchored && !glob_pattern.contains(['/', '\\']) {
            glob_pattern = format!("**/{glob_pattern}");
        }

        if glob_pattern.contains(['{', '}']) {
            let unbalanced = || IgnoreError::UnbalancedBraces {
                pattern: line.to_owned(),
            };
            let (prefix, suffix) = glob_pattern.split_once('{').ok_or_else(unbalanced)?;
            let (alternatives, rest) = suffix.split_once('}').ok_or_else(unbalanced)?;
            for alternative in alternatives.split(',').map(str::trim) {
                let expanded = format!("{prefix}{alternative}{rest}").replace("[GLOBSTAR]", "**");
                self.push(&expanded, negated, anchored)?;
            }
            return Ok(());
        }

        if bare_filename && !anchored {
            self.push(&format!("**/{body}"), negated, false)?;
            self.push(body, negated, false)?;
            return Ok(());
        }

        self.push(&glob_pattern.replace("[GLOBSTAR]", "**"), negated, anchored)
    }

    fn push(&mut self, glob_pattern: &str, negated: bool, anchored: bool) -> Result<(), IgnoreError> {
        let pattern = Pattern::new(glob_pattern).map_err(|source| IgnoreError::Pattern {
            pattern: glob_pattern.to_owned(),
            source,
        })?;
        self.rules.push(Rule {
            pattern,
            negated,
            anchored,
        });
        Ok(())
    }

    /// Whether `path` is ignored. A matching negated rule wins over any ignoring rule.
    #[inline]
    pub fn matches<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().replace('\\', "/");
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy())
            .unwrap_or_default();

        if self
            .rules
            .iter()
            .any(|rule| rule.negated && rule.applies_to(&path_str, &filename))
        {
            return false;
        }
        self.rules
            .iter()
            .any(|rule| !rule.negated && rule.applies_to(&path_str, &filename))
    }
}
