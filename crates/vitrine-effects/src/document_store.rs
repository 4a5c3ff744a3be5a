//! In-memory document store handler.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use vitrine_core::effects::{Document, DocumentStore, QuerySpec, Snapshot};
use vitrine_core::reactive::Dynamic;
use vitrine_core::time::normalize_timestamp_ms;
use vitrine_core::{Result, VitrineError};

/// In-memory [`DocumentStore`].
///
/// Watched queries are re-evaluated and republished on every write, which is
/// the push-snapshot behavior the aggregation layer is written against.
/// `inject_error` flips every watcher into the error state, for exercising
/// the degraded-source path without a real backend.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    collections: Mutex<BTreeMap<String, BTreeMap<String, Map<String, Value>>>>,
    watchers: Mutex<Vec<Watcher>>,
    injected_error: Mutex<Option<VitrineError>>,
}

struct Watcher {
    query: QuerySpec,
    output: Dynamic<Snapshot<Document>>,
}

impl MemoryDocumentStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put every watcher into the given error state until
    /// [`clear_injected_error`](Self::clear_injected_error) is called.
    pub fn inject_error(&self, error: VitrineError) {
        *self.inner.injected_error.lock() = Some(error);
        self.republish();
    }

    /// Lift an injected error; watchers get fresh data snapshots again.
    pub fn clear_injected_error(&self) {
        *self.inner.injected_error.lock() = None;
        self.republish();
    }

    fn republish(&self) {
        let error = self.inner.injected_error.lock().clone();
        let collections = self.inner.collections.lock();
        let watchers = self.inner.watchers.lock();
        for watcher in watchers.iter() {
            match &error {
                Some(err) => watcher.output.set(Err(err.clone())),
                None => watcher.output.set(Ok(evaluate(&collections, &watcher.query))),
            }
        }
    }
}

/// Run a query against the current collection state.
fn evaluate(
    collections: &BTreeMap<String, BTreeMap<String, Map<String, Value>>>,
    query: &QuerySpec,
) -> Vec<Document> {
    let mut docs: Vec<Document> = collections
        .get(&query.collection)
        .map(|coll| {
            coll.iter()
                .filter(|(_, data)| match &query.filter_eq {
                    Some((field, expected)) => data.get(field) == Some(expected),
                    None => true,
                })
                .map(|(id, data)| Document::new(id.clone(), data.clone()))
                .collect()
        })
        .unwrap_or_default();

    if let Some(field) = &query.order_by_desc {
        docs.sort_by_key(|doc| {
            let key = doc
                .field(field)
                .and_then(normalize_timestamp_ms)
                .unwrap_or(i64::MIN);
            std::cmp::Reverse(key)
        });
    }
    if let Some(limit) = query.limit {
        docs.truncate(limit);
    }
    docs
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.inner.collections.lock();
        Ok(collections
            .get(collection)
            .and_then(|coll| coll.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<()> {
        {
            let mut collections = self.inner.collections.lock();
            let doc = collections
                .entry(collection.to_owned())
                .or_default()
                .entry(id.to_owned())
                .or_default();
            for (field, value) in data {
                doc.insert(field, value);
            }
        }
        self.republish();
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        {
            let mut collections = self.inner.collections.lock();
            if let Some(coll) = collections.get_mut(collection) {
                coll.remove(id);
            }
        }
        self.republish();
        Ok(())
    }

    async fn watch(&self, query: QuerySpec) -> Dynamic<Snapshot<Document>> {
        let initial = match self.inner.injected_error.lock().clone() {
            Some(err) => Err(err),
            None => Ok(evaluate(&self.inner.collections.lock(), &query)),
        };
        let output = Dynamic::new(initial);
        self.inner.watchers.lock().push(Watcher {
            query,
            output: output.clone(),
        });
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_set_merges_fields() {
        let store = MemoryDocumentStore::new();
        store
            .set_document("pages", "home", fields(json!({ "a": 1, "b": 2 })))
            .await
            .unwrap();
        store
            .set_document("pages", "home", fields(json!({ "b": 3 })))
            .await
            .unwrap();

        let doc = store.get_document("pages", "home").await.unwrap().unwrap();
        assert_eq!(doc.field("a"), Some(&json!(1)));
        assert_eq!(doc.field("b"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_watch_republishes_on_write() {
        let store = MemoryDocumentStore::new();
        let watched = store
            .watch(
                QuerySpec::collection("notifications")
                    .order_by_desc("createdAt")
                    .limit(2),
            )
            .await;
        assert_eq!(watched.get().unwrap().len(), 0);

        for (id, at) in [("n1", 100), ("n2", 300), ("n3", 200)] {
            store
                .set_document("notifications", id, fields(json!({ "createdAt": at })))
                .await
                .unwrap();
        }

        let snapshot = watched.get().unwrap();
        let ids: Vec<&str> = snapshot.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["n2", "n3"]);
    }

    #[tokio::test]
    async fn test_filter_eq() {
        let store = MemoryDocumentStore::new();
        store
            .set_document("notifications", "n1", fields(json!({ "userId": "u1" })))
            .await
            .unwrap();
        store
            .set_document("notifications", "n2", fields(json!({ "userId": "u2" })))
            .await
            .unwrap();

        let watched = store
            .watch(QuerySpec::collection("notifications").filter_eq("userId", json!("u1")))
            .await;
        let snapshot = watched.get().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "n1");
    }

    #[tokio::test]
    async fn test_injected_error_reaches_watchers_and_clears() {
        let store = MemoryDocumentStore::new();
        let watched = store.watch(QuerySpec::collection("notifications")).await;

        store.inject_error(VitrineError::network("listener dropped"));
        assert!(watched.get().is_err());

        store.clear_injected_error();
        assert!(watched.get().is_ok());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryDocumentStore::new();
        store.delete_document("pages", "missing").await.unwrap();
    }
}
