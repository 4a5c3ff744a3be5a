//! In-memory content document with path-addressed mutation.

use crate::content::path::{FieldPath, PathSegment};
use crate::types::Locale;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A page's content document as edited in the console.
///
/// The document is a nested JSON object keyed by section name; leaves are
/// localized-string objects (`{"en": "...", "de": "..."}`) or arrays of them.
/// All mutation goes through dotted [`FieldPath`]s, and writes vivify missing
/// intermediate containers instead of erroring, so an editor can fill in a
/// field of a section that has never been saved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDraft {
    data: Map<String, Value>,
}

impl ContentDraft {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing document tree.
    pub fn from_map(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Borrow the underlying tree.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Consume the draft, yielding the underlying tree.
    pub fn into_map(self) -> Map<String, Value> {
        self.data
    }

    /// Whether the document has no sections at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read the value at `path`, if the whole path exists.
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let mut segments = path.segments().iter();
        let mut current = match segments.next()? {
            PathSegment::Key(k) => self.data.get(k)?,
            PathSegment::Index(_) => return None,
        };
        for seg in segments {
            current = match (seg, current) {
                (PathSegment::Key(k), Value::Object(map)) => map.get(k)?,
                (PathSegment::Index(i), Value::Array(items)) => items.get(*i)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Read the string at `path`, if present.
    pub fn get_str(&self, path: &FieldPath) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Write `value` at `path`, creating missing intermediates.
    ///
    /// A missing or wrong-kind intermediate is replaced by the container the
    /// next segment needs (object for a key, array for an index); arrays are
    /// padded with `null` up to the addressed index.
    pub fn set(&mut self, path: &FieldPath, value: Value) {
        let segments = path.segments();
        // The root is an object; a leading index segment is treated as a key.
        let first_key = match &segments[0] {
            PathSegment::Key(k) => k.clone(),
            PathSegment::Index(i) => i.to_string(),
        };
        let mut slot = self.data.entry(first_key).or_insert(Value::Null);
        for seg in &segments[1..] {
            slot = descend(slot, seg);
        }
        *slot = value;
    }

    /// Merge per-locale strings into the leaf object at `path`.
    ///
    /// Existing locales not present in `locales` are preserved; a missing or
    /// non-object leaf becomes a fresh object first.
    pub fn merge_locales(&mut self, path: &FieldPath, locales: &BTreeMap<Locale, String>) {
        let mut merged = match self.get(path) {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        for (locale, text) in locales {
            merged.insert(locale.as_str().to_owned(), Value::String(text.clone()));
        }
        self.set(path, Value::Object(merged));
    }
}

/// Step one segment into `value`, vivifying the container the segment needs,
/// and return the child slot.
fn descend<'a>(value: &'a mut Value, seg: &PathSegment) -> &'a mut Value {
    match seg {
        PathSegment::Key(k) => {
            if !value.is_object() {
                *value = Value::Object(Map::new());
            }
            match value {
                Value::Object(map) => map.entry(k.clone()).or_insert(Value::Null),
                _ => unreachable!("object established above"),
            }
        }
        PathSegment::Index(i) => {
            if !value.is_array() {
                *value = Value::Array(Vec::new());
            }
            match value {
                Value::Array(items) => {
                    while items.len() <= *i {
                        items.push(Value::Null);
                    }
                    &mut items[*i]
                }
                _ => unreachable!("array established above"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn path(raw: &str) -> FieldPath {
        FieldPath::parse(raw).unwrap()
    }

    #[test]
    fn test_get_existing_path() {
        let draft = ContentDraft::from_map(
            json!({ "hero": { "title": { "en": "Welcome" } } })
                .as_object()
                .unwrap()
                .clone(),
        );
        assert_eq!(
            draft.get(&path("hero.title.en")),
            Some(&json!("Welcome"))
        );
        assert_eq!(draft.get(&path("hero.subtitle")), None);
    }

    #[test]
    fn test_set_vivifies_missing_objects() {
        let mut draft = ContentDraft::new();
        draft.set(&path("hero.title.en"), json!("Welcome"));
        assert_eq!(draft.get(&path("hero.title.en")), Some(&json!("Welcome")));
    }

    #[test]
    fn test_set_vivifies_arrays_with_null_padding() {
        let mut draft = ContentDraft::new();
        draft.set(&path("features.2.label"), json!("Fast"));
        assert_eq!(
            draft.get(&path("features")),
            Some(&json!([null, null, { "label": "Fast" }]))
        );
    }

    #[test]
    fn test_set_replaces_wrong_kind_intermediate() {
        let mut draft = ContentDraft::from_map(
            json!({ "hero": "not an object" }).as_object().unwrap().clone(),
        );
        draft.set(&path("hero.title"), json!("Welcome"));
        assert_eq!(draft.get(&path("hero.title")), Some(&json!("Welcome")));
    }

    #[test]
    fn test_set_overwrites_existing_leaf() {
        let mut draft = ContentDraft::new();
        draft.set(&path("seo.description"), json!("old"));
        draft.set(&path("seo.description"), json!("new"));
        assert_eq!(draft.get(&path("seo.description")), Some(&json!("new")));
    }

    #[test]
    fn test_merge_locales_preserves_untouched_locales() {
        let mut draft = ContentDraft::new();
        draft.set(&path("hero.title"), json!({ "en": "Welcome", "fr": "Bienvenue" }));

        let mut translated = BTreeMap::new();
        translated.insert(Locale::new("de"), "Willkommen".to_owned());
        translated.insert(Locale::new("fr"), "Bienvenue!".to_owned());
        draft.merge_locales(&path("hero.title"), &translated);

        assert_eq!(
            draft.get(&path("hero.title")),
            Some(&json!({ "en": "Welcome", "fr": "Bienvenue!", "de": "Willkommen" }))
        );
    }

    #[test]
    fn test_merge_locales_vivifies_missing_leaf() {
        let mut draft = ContentDraft::new();
        let mut translated = BTreeMap::new();
        translated.insert(Locale::new("de"), "Hallo".to_owned());
        draft.merge_locales(&path("hero.greeting"), &translated);
        assert_eq!(
            draft.get(&path("hero.greeting")),
            Some(&json!({ "de": "Hallo" }))
        );
    }

    proptest! {
        /// A write at any depth is readable back at the same path.
        #[test]
        fn prop_set_then_get_at_arbitrary_depth(
            segments in proptest::collection::vec("[a-z]{1,8}", 1..6),
            text in "[ -~]{0,32}",
        ) {
            let raw = segments.join(".");
            let p = FieldPath::parse(&raw).unwrap();
            let mut draft = ContentDraft::new();
            draft.set(&p, json!(text));
            prop_assert_eq!(draft.get(&p), Some(&json!(text)));
        }

        /// Mixed key/index paths vivify and read back too.
        #[test]
        fn prop_vivification_with_indices(
            head in "[a-z]{1,8}",
            idx in 0usize..8,
            tail in "[a-z]{1,8}",
        ) {
            let raw = format!("{head}.{idx}.{tail}");
            let p = FieldPath::parse(&raw).unwrap();
            let mut draft = ContentDraft::new();
            draft.set(&p, json!("x"));
            prop_assert_eq!(draft.get(&p), Some(&json!("x")));
        }
    }
}
