//! Dotted field paths into a content document.

use crate::errors::{Result, VitrineError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a [`FieldPath`].
///
/// A segment that parses as a `usize` addresses an array index, anything else
/// addresses an object key. This mirrors how the paths are written by hand in
/// translate batches ("features.0.label").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

impl PathSegment {
    fn parse(raw: &str) -> Self {
        match raw.parse::<usize>() {
            Ok(idx) => Self::Index(idx),
            Err(_) => Self::Key(raw.to_owned()),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

/// A parsed dotted path such as `hero.title` or `features.2.label`.
///
/// Paths are never empty; parsing rejects the empty string and any path with
/// an empty segment (`"a..b"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Parse a dotted path.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(VitrineError::invalid("field path must not be empty"));
        }
        let mut segments = Vec::new();
        for part in raw.split('.') {
            if part.is_empty() {
                return Err(VitrineError::invalid(format!(
                    "field path '{raw}' has an empty segment"
                )));
            }
            segments.push(PathSegment::parse(part));
        }
        Ok(Self { segments })
    }

    /// The path's segments, in order. Never empty.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Extend this path with one more key segment.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    /// Extend this path with an array index segment.
    pub fn index(&self, idx: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(idx));
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for FieldPath {
    type Error = VitrineError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys_and_indices() {
        let path = FieldPath::parse("features.2.label").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Key("features".to_owned()),
                PathSegment::Index(2),
                PathSegment::Key("label".to_owned()),
            ]
        );
    }

    #[test]
    fn test_rejects_empty_and_degenerate_paths() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse(".a").is_err());
        assert!(FieldPath::parse("a.").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for raw in ["hero.title", "features.0.label", "seo"] {
            assert_eq!(FieldPath::parse(raw).unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_builders() {
        let path = FieldPath::parse("features").unwrap().index(1).child("label");
        assert_eq!(path.to_string(), "features.1.label");
    }

    #[test]
    fn test_serde_as_string() {
        let path: FieldPath = serde_json::from_str("\"hero.title\"").unwrap();
        assert_eq!(path.to_string(), "hero.title");
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"hero.title\"");
        assert!(serde_json::from_str::<FieldPath>("\"\"").is_err());
    }
}
