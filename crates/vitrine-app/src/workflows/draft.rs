//! Content draft editing against the document store.

use crate::errors::AppError;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use vitrine_core::content::{ContentDraft, FieldPath};
use vitrine_core::effects::{Clock, DocumentStore};
use vitrine_core::reactive::Dynamic;

/// Edits one page document as an in-memory draft.
///
/// Mutations land in the draft `Dynamic` only (feeding the live preview);
/// nothing reaches the store until [`save`](Self::save), which writes the
/// whole document with merge semantics plus an `updatedAt` stamp.
/// [`reset`](Self::reset) restores the last loaded or saved state.
pub struct DraftWorkflow {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    collection: String,
    doc_id: String,
    draft: Dynamic<ContentDraft>,
    saved: Mutex<ContentDraft>,
}

impl DraftWorkflow {
    /// Bind to one document; call [`load`](Self::load) before editing.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        collection: impl Into<String>,
        doc_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            clock,
            collection: collection.into(),
            doc_id: doc_id.into(),
            draft: Dynamic::new(ContentDraft::new()),
            saved: Mutex::new(ContentDraft::new()),
        }
    }

    /// The live draft. Preview sync and editors subscribe to this.
    pub fn draft(&self) -> &Dynamic<ContentDraft> {
        &self.draft
    }

    /// Pull the stored document into the draft. A document that does not
    /// exist yet loads as an empty draft.
    pub async fn load(&self) -> Result<(), AppError> {
        let doc = self
            .store
            .get_document(&self.collection, &self.doc_id)
            .await
            .map_err(|err| AppError::action("Load page", err))?;
        let draft = doc
            .map(|d| ContentDraft::from_map(d.data))
            .unwrap_or_default();
        *self.saved.lock() = draft.clone();
        self.draft.set(draft);
        Ok(())
    }

    /// Mutate one field, vivifying intermediates.
    pub fn update_field(&self, path: &FieldPath, value: Value) {
        self.draft.update(|mut draft| {
            draft.set(path, value);
            draft
        });
    }

    /// Mutate several fields as one draft change (one preview update).
    pub fn update_batch(&self, updates: Vec<(FieldPath, Value)>) {
        self.draft.update(|mut draft| {
            for (path, value) in updates {
                draft.set(&path, value);
            }
            draft
        });
    }

    /// Whether the draft differs from the last loaded/saved state.
    pub fn has_changes(&self) -> bool {
        self.draft.get() != *self.saved.lock()
    }

    /// Discard edits, restoring the last loaded/saved state.
    pub fn reset(&self) {
        self.draft.set(self.saved.lock().clone());
    }

    /// Write the whole draft to the store with an `updatedAt` stamp.
    pub async fn save(&self) -> Result<(), AppError> {
        let draft = self.draft.get();
        let mut data = draft.clone().into_map();
        data.insert("updatedAt".to_owned(), Value::from(self.clock.now_ms()));
        self.store
            .set_document(&self.collection, &self.doc_id, data)
            .await
            .map_err(|err| AppError::action("Save page", err))?;
        *self.saved.lock() = draft;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vitrine_effects::{MemoryDocumentStore, SimulatedClock};

    fn path(raw: &str) -> FieldPath {
        FieldPath::parse(raw).unwrap()
    }

    fn workflow(store: &MemoryDocumentStore, clock: &SimulatedClock) -> DraftWorkflow {
        DraftWorkflow::new(
            Arc::new(store.clone()),
            Arc::new(clock.clone()),
            "pages",
            "home",
        )
    }

    #[tokio::test]
    async fn test_load_missing_document_gives_empty_draft() {
        let store = MemoryDocumentStore::new();
        let wf = workflow(&store, &SimulatedClock::at(0));
        wf.load().await.unwrap();
        assert!(wf.draft().get().is_empty());
        assert!(!wf.has_changes());
    }

    #[tokio::test]
    async fn test_edit_save_roundtrip_with_stamp() {
        let store = MemoryDocumentStore::new();
        let clock = SimulatedClock::at(5_000);
        let wf = workflow(&store, &clock);
        wf.load().await.unwrap();

        wf.update_field(&path("hero.title.en"), json!("Welcome"));
        assert!(wf.has_changes());
        wf.save().await.unwrap();
        assert!(!wf.has_changes());

        let doc = store
            .get_document("pages", "home")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.data["hero"]["title"]["en"], "Welcome");
        assert_eq!(doc.data["updatedAt"], json!(5_000));
    }

    #[tokio::test]
    async fn test_reset_restores_saved_state() {
        let store = MemoryDocumentStore::new();
        let wf = workflow(&store, &SimulatedClock::at(0));
        wf.load().await.unwrap();

        wf.update_field(&path("hero.title.en"), json!("keep"));
        wf.save().await.unwrap();
        wf.update_field(&path("hero.title.en"), json!("discard"));
        wf.reset();

        assert_eq!(
            wf.draft().get().get(&path("hero.title.en")),
            Some(&json!("keep"))
        );
        assert!(!wf.has_changes());
    }

    #[tokio::test]
    async fn test_update_batch_is_one_draft_version() {
        let store = MemoryDocumentStore::new();
        let wf = workflow(&store, &SimulatedClock::at(0));
        wf.load().await.unwrap();

        let before = wf.draft().version();
        wf.update_batch(vec![
            (path("hero.title.en"), json!("a")),
            (path("hero.subtitle.en"), json!("b")),
        ]);
        assert_eq!(wf.draft().version(), before + 1);
    }
}
