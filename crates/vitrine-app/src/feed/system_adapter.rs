//! System-notification source adapter: stored documents in, records out.

use crate::errors::AppError;
use crate::views::{NotificationKind, NotificationRecord, NotificationSource, RouteHint};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use vitrine_core::effects::{Document, DocumentStore, QuerySpec, Snapshot};
use vitrine_core::reactive::{Dynamic, Subscription};
use vitrine_core::time::normalize_timestamp_ms;
use vitrine_core::types::{NotificationId, UserId};

/// Most-recent cap on the watched notification query.
pub const SYSTEM_QUERY_LIMIT: usize = 50;

/// Maps the current user's stored system notifications to records.
///
/// Read state lives in the documents themselves (`read` flag), so
/// [`mark_read`](Self::mark_read) is a store write and the change comes back
/// through the watched query like any other.
pub struct SystemFeedAdapter {
    store: Arc<dyn DocumentStore>,
    collection: String,
    docs: Subscription<Snapshot<Document>>,
    output: Dynamic<Vec<NotificationRecord>>,
    primed: bool,
}

impl SystemFeedAdapter {
    /// Watch the newest [`SYSTEM_QUERY_LIMIT`] notifications for `uid`.
    pub async fn attach(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        uid: &UserId,
    ) -> Self {
        let collection = collection.into();
        let query = QuerySpec::collection(collection.clone())
            .filter_eq("userId", json!(uid.as_str()))
            .order_by_desc("createdAt")
            .limit(SYSTEM_QUERY_LIMIT);
        let docs = store.watch(query).await.subscribe();
        Self {
            store,
            collection,
            docs,
            output: Dynamic::new(Vec::new()),
            primed: false,
        }
    }

    /// This adapter's record list. The aggregator subscribes to it.
    pub fn output(&self) -> &Dynamic<Vec<NotificationRecord>> {
        &self.output
    }

    /// Process the upstream snapshot if it changed. A degraded snapshot is
    /// logged and skipped; the last published records stand.
    pub fn pump(&mut self) {
        let snapshot = if self.primed {
            match self.docs.poll() {
                Some(s) => s,
                None => return,
            }
        } else {
            self.primed = true;
            self.docs.get()
        };
        match snapshot {
            Ok(docs) => {
                let records = docs.iter().map(map_document).collect();
                self.output.set(records);
            }
            Err(err) => {
                tracing::warn!(error = %err, "system source degraded; keeping last records");
            }
        }
    }

    /// Persist the read flag on one notification.
    pub async fn mark_read(&self, id: &NotificationId) -> Result<(), AppError> {
        let mut fields = Map::new();
        fields.insert("read".to_owned(), Value::Bool(true));
        self.store
            .set_document(&self.collection, id.as_str(), fields)
            .await
            .map_err(|err| AppError::action("Mark notification read", err))
    }
}

fn map_document(doc: &Document) -> NotificationRecord {
    let kind = doc
        .field_str("type")
        .map(NotificationKind::from_stored)
        .unwrap_or(NotificationKind::Other);
    let title = doc
        .field_str("title")
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| kind.default_title().to_owned());
    let body = doc.field_str("message").unwrap_or_default().to_owned();
    let timestamp_ms = doc.field("createdAt").and_then(normalize_timestamp_ms);
    let is_read = doc
        .field("read")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let route_hint = doc
        .field_str("link")
        .filter(|l| !l.is_empty())
        .map(|l| RouteHint::Url(l.to_owned()));

    NotificationRecord {
        id: NotificationId::new(doc.id.as_str()),
        source: NotificationSource::System,
        kind,
        title,
        body,
        actor_avatar_url: doc.field_str("actorAvatarUrl").map(str::to_owned),
        timestamp_ms,
        is_read,
        route_hint,
    }
}
