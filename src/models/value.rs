// src/models/value.rs
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A frontmatter attribute value.
///
/// Serializes externally tagged (`{"String": "draft"}`, `{"Number": 3.0}`) so consumers can
/// tell the original YAML type apart after the round trip through JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    String(String),
    Number(f64),
    Boolean(bool),
    List(Vec<Value>),
}

impl Value {
    /// Converts a decoded YAML node. Returns `None` for nested mappings, which notes do not
    /// carry as attributes. `.nan` and `.inf` become strings.
    #[must_use]
    pub fn from_yaml(yaml: serde_yaml_ng::Value) -> Option<Self> {
        use serde_yaml_ng::Value as Yaml;

        match yaml {
            Yaml::Null => Some(Self::List(Vec::new())),
            Yaml::Bool(b) => Some(Self::Boolean(b)),
            // JSON has no NaN or infinity, so those keep their YAML spelling.
            Yaml::Number(n) => Some(
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map_or_else(|| Self::String(n.to_string()), Self::Number),
            ),
            Yaml::String(s) => Some(Self::String(s)),
            Yaml::Sequence(items) => Some(Self::List(
                items.into_iter().filter_map(Self::from_yaml).collect(),
            )),
            Yaml::Mapping(_) => None,
            Yaml::Tagged(tagged) => Self::from_yaml(tagged.value),
        }
    }

    /// Renders a YAML scalar used as a mapping key. Composite keys have no rendering.
    #[must_use]
    pub fn key_from_yaml(key: &serde_yaml_ng::Value) -> Option<String> {
        use serde_yaml_ng::Value as Yaml;

        match key {
            Yaml::String(s) => Some(s.clone()),
            Yaml::Bool(b) => Some(b.to_string()),
            Yaml::Number(n) => Some(n.to_string()),
            Yaml::Tagged(tagged) => Self::key_from_yaml(&tagged.value),
            Yaml::Null | Yaml::Sequence(_) | Yaml::Mapping(_) => None,
        }
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar equality with a rendering fallback, so `"3"` and `3` are considered equal.
    #[must_use]
    pub fn loosely_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loosely_equals(y))
            }
            (Self::List(_), _) | (_, Self::List(_)) => false,
            (a, b) => a == b || a.to_string() == b.to_string(),
        }
    }

    /// Equality, or membership when `self` is a list attribute.
    #[must_use]
    pub fn matches(&self, needle: &Self) -> bool {
        if self.loosely_equals(needle) {
            return true;
        }
        match self {
            Self::List(items) => items.iter().any(|item| item.loosely_equals(needle)),
            _ => false,
        }
    }

    /// Orders two scalars. Numbers (and numeric strings facing a number) compare
    /// numerically, strings lexicographically; every other pairing is incomparable.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Number(a), Self::String(b)) => {
                b.parse::<f64>().ok().and_then(|b| a.partial_cmp(&b))
            }
            (Self::String(a), Self::Number(b)) => {
                a.parse::<f64>().ok().and_then(|a| a.partial_cmp(b))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{n:.0}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}
