//! Document store contract.
//!
//! Collections of JSON documents with merge-on-write and watched queries.
//! System notifications and content pages both live here.

use crate::errors::Result;
use crate::reactive::Dynamic;
use crate::VitrineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored document: its id plus the JSON tree under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document id within its collection
    pub id: String,
    /// Field tree
    pub data: Map<String, Value>,
}

impl Document {
    /// Build a document from an id and field tree.
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Read a top-level field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Read a top-level field as a string.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }
}

/// A watched query over one collection.
///
/// Kept deliberately small: the feed only ever needs "newest N of a
/// collection", optionally filtered on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Collection to watch
    pub collection: String,
    /// Equality filter on a top-level field, if any
    pub filter_eq: Option<(String, Value)>,
    /// Top-level field to order by, descending
    pub order_by_desc: Option<String>,
    /// Maximum number of documents delivered per snapshot
    pub limit: Option<usize>,
}

impl QuerySpec {
    /// Watch a whole collection, unordered and unbounded.
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filter_eq: None,
            order_by_desc: None,
            limit: None,
        }
    }

    /// Add an equality filter on a top-level field.
    pub fn filter_eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filter_eq = Some((field.into(), value));
        self
    }

    /// Order by a top-level field, newest first.
    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by_desc = Some(field.into());
        self
    }

    /// Cap the number of delivered documents.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

/// One delivery of a watched result set.
///
/// Errors travel the same channel as data so a consumer sees a failed
/// subscription as a value rather than a torn-down stream.
pub type Snapshot<T> = std::result::Result<Vec<T>, VitrineError>;

/// Collections of JSON documents with merge-on-write semantics.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, `None` if absent.
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Write fields into a document, creating it if absent. Fields not named
    /// in `data` are left untouched (merge semantics).
    async fn set_document(&self, collection: &str, id: &str, data: Map<String, Value>)
        -> Result<()>;

    /// Delete one document. Deleting an absent document is not an error.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<()>;

    /// Watch a query. The returned handle holds the latest snapshot and is
    /// updated by the store whenever the result set changes; the initial
    /// snapshot is populated before this returns.
    async fn watch(&self, query: QuerySpec) -> Dynamic<Snapshot<Document>>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        (**self).get_document(collection, id).await
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<()> {
        (**self).set_document(collection, id, data).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        (**self).delete_document(collection, id).await
    }

    async fn watch(&self, query: QuerySpec) -> Dynamic<Snapshot<Document>> {
        (**self).watch(query).await
    }
}
