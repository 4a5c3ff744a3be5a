//! Auto-translate: fill every configured locale from the source locale.

use crate::errors::AppError;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use vitrine_core::content::{ContentDraft, FieldPath};
use vitrine_core::effects::Translator;
use vitrine_core::reactive::Dynamic;
use vitrine_core::types::Locale;
use vitrine_core::VitrineError;

/// Which parts of a page document a translate run covers.
///
/// Content documents use four recurring shapes for localized text; a batch
/// names each shape declaratively and is expanded against the current draft
/// (array lengths are read at expansion time).
#[derive(Debug, Clone, Default)]
pub struct TranslateBatch {
    /// Leaf localized objects: `"hero.title"`
    pub fields: Vec<String>,
    /// Objects holding several localized leaves: `("seo", ["title", "description"])`
    pub object_fields: Vec<(String, Vec<String>)>,
    /// Arrays whose elements are localized objects: `"quotes"`
    pub array_fields: Vec<String>,
    /// Arrays of objects with localized leaves: `("features", ["label"])`
    pub array_object_fields: Vec<(String, Vec<String>)>,
}

impl TranslateBatch {
    /// Expand the declarative shapes into concrete field paths against the
    /// given draft. Invalid path strings are skipped (they address nothing).
    fn expand(&self, draft: &ContentDraft) -> Vec<FieldPath> {
        let mut paths = Vec::new();
        for field in &self.fields {
            if let Ok(path) = FieldPath::parse(field) {
                paths.push(path);
            }
        }
        for (base, keys) in &self.object_fields {
            if let Ok(base) = FieldPath::parse(base) {
                paths.extend(keys.iter().map(|k| base.child(k.clone())));
            }
        }
        for base in &self.array_fields {
            if let Ok(base) = FieldPath::parse(base) {
                for i in 0..array_len(draft, &base) {
                    paths.push(base.index(i));
                }
            }
        }
        for (base, keys) in &self.array_object_fields {
            if let Ok(base) = FieldPath::parse(base) {
                for i in 0..array_len(draft, &base) {
                    let element = base.index(i);
                    paths.extend(keys.iter().map(|k| element.child(k.clone())));
                }
            }
        }
        paths
    }
}

fn array_len(draft: &ContentDraft, path: &FieldPath) -> usize {
    draft
        .get(path)
        .and_then(|v| v.as_array())
        .map(Vec::len)
        .unwrap_or(0)
}

/// Runs translate batches against a draft.
///
/// All-or-nothing: locale values are merged back only after the translator
/// returns a complete result; any failure leaves the draft untouched. At
/// most one run at a time per workflow.
pub struct TranslateWorkflow {
    translator: Arc<dyn Translator>,
    busy: AtomicBool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl TranslateWorkflow {
    /// Wrap a translator.
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            translator,
            busy: AtomicBool::new(false),
        }
    }

    /// Whether a run is in flight.
    pub fn is_translating(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Translate every non-empty source-locale value the batch names and
    /// merge the results into the draft as one change.
    pub async fn translate(
        &self,
        draft: &Dynamic<ContentDraft>,
        batch: &TranslateBatch,
        source: &Locale,
        targets: &[Locale],
    ) -> Result<(), AppError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(AppError::input(
                "Translation already running",
                "Wait for the current run to finish",
            ));
        }
        let _guard = BusyGuard(&self.busy);

        if targets.is_empty() {
            return Err(AppError::input(
                "No target languages",
                "Pick at least one language to translate into",
            ));
        }

        let snapshot = draft.get();
        let mut texts = BTreeMap::new();
        let mut paths = Vec::new();
        for path in batch.expand(&snapshot) {
            let source_leaf = path.child(source.as_str());
            match snapshot.get_str(&source_leaf) {
                Some(text) if !text.trim().is_empty() => {
                    texts.insert(path.to_string(), text.to_owned());
                    paths.push(path);
                }
                _ => {}
            }
        }
        if texts.is_empty() {
            return Err(AppError::input(
                "Nothing to translate",
                "Fill in the source language first",
            ));
        }

        let translated = self
            .translator
            .translate(texts, source, targets)
            .await
            .map_err(|err| AppError::action("Auto-translate", err))?;

        // Enforce the all-or-nothing contract before touching the draft.
        for path in &paths {
            let per_locale = translated.get(&path.to_string()).ok_or_else(|| {
                AppError::action(
                    "Auto-translate",
                    VitrineError::translation(format!("missing result for {path}")),
                )
            })?;
            for target in targets {
                if !per_locale.contains_key(target) {
                    return Err(AppError::action(
                        "Auto-translate",
                        VitrineError::translation(format!("missing {target} result for {path}")),
                    ));
                }
            }
        }

        draft.update(|mut current| {
            for path in &paths {
                if let Some(per_locale) = translated.get(&path.to_string()) {
                    current.merge_locales(path, per_locale);
                }
            }
            current
        });
        Ok(())
    }
}
