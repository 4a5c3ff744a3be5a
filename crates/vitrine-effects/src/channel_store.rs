//! In-memory realtime channel store handler.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;
use vitrine_core::effects::{ChannelStore, Snapshot};
use vitrine_core::reactive::Dynamic;
use vitrine_core::types::{
    ChannelId, ChannelSummary, ChatMessage, MessageId, PresenceStatus, UserId,
};
use vitrine_core::{Result, VitrineError};

/// In-memory [`ChannelStore`].
///
/// Every mutation republishes the snapshots it affects, matching the
/// push-on-change behavior of a realtime backend. `fail_appends` turns every
/// append into a network error, for exercising the failed-reply path.
#[derive(Clone, Default)]
pub struct MemoryChannelStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    channels: Mutex<BTreeMap<ChannelId, ChannelRecord>>,
    presence: Mutex<BTreeMap<UserId, PresenceStatus>>,
    channels_out: Mutex<Option<Dynamic<Snapshot<ChannelSummary>>>>,
    messages_out: Mutex<BTreeMap<ChannelId, Dynamic<Snapshot<ChatMessage>>>>,
    presence_out: Mutex<Option<Dynamic<Snapshot<(UserId, PresenceStatus)>>>>,
    fail_appends: Mutex<bool>,
}

struct ChannelRecord {
    summary: ChannelSummary,
    messages: Vec<ChatMessage>,
}

impl MemoryChannelStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent append fail with a network error.
    pub fn fail_appends(&self, fail: bool) {
        *self.inner.fail_appends.lock() = fail;
    }

    /// Seed a channel without going through `create_channel` (test setup).
    pub fn seed_channel(&self, summary: ChannelSummary) {
        self.inner.channels.lock().insert(
            summary.id.clone(),
            ChannelRecord {
                summary,
                messages: Vec::new(),
            },
        );
        self.publish_channels();
    }

    fn publish_channels(&self) {
        let snapshot: Vec<ChannelSummary> = self
            .inner
            .channels
            .lock()
            .values()
            .map(|rec| rec.summary.clone())
            .collect();
        if let Some(out) = self.inner.channels_out.lock().as_ref() {
            out.set(Ok(snapshot));
        }
    }

    fn publish_messages(&self, channel: &ChannelId) {
        let snapshot: Vec<ChatMessage> = self
            .inner
            .channels
            .lock()
            .get(channel)
            .map(|rec| rec.messages.clone())
            .unwrap_or_default();
        if let Some(out) = self.inner.messages_out.lock().get(channel) {
            out.set(Ok(snapshot));
        }
    }

    fn publish_presence(&self) {
        let snapshot: Vec<(UserId, PresenceStatus)> = self
            .inner
            .presence
            .lock()
            .iter()
            .map(|(uid, status)| (uid.clone(), status.clone()))
            .collect();
        if let Some(out) = self.inner.presence_out.lock().as_ref() {
            out.set(Ok(snapshot));
        }
    }

    fn with_channel<R>(
        &self,
        channel: &ChannelId,
        f: impl FnOnce(&mut ChannelRecord) -> R,
    ) -> Result<R> {
        let mut channels = self.inner.channels.lock();
        let record = channels
            .get_mut(channel)
            .ok_or_else(|| VitrineError::not_found(format!("channel {channel}")))?;
        Ok(f(record))
    }
}

#[async_trait]
impl ChannelStore for MemoryChannelStore {
    async fn channels(&self) -> Dynamic<Snapshot<ChannelSummary>> {
        let snapshot: Vec<ChannelSummary> = self
            .inner
            .channels
            .lock()
            .values()
            .map(|rec| rec.summary.clone())
            .collect();
        let mut out = self.inner.channels_out.lock();
        out.get_or_insert_with(|| Dynamic::new(Ok(snapshot))).clone()
    }

    async fn watch_messages(&self, channel: &ChannelId) -> Dynamic<Snapshot<ChatMessage>> {
        let snapshot: Vec<ChatMessage> = self
            .inner
            .channels
            .lock()
            .get(channel)
            .map(|rec| rec.messages.clone())
            .unwrap_or_default();
        let mut outs = self.inner.messages_out.lock();
        outs.entry(channel.clone())
            .or_insert_with(|| Dynamic::new(Ok(snapshot)))
            .clone()
    }

    async fn append_message(
        &self,
        channel: &ChannelId,
        mut message: ChatMessage,
    ) -> Result<MessageId> {
        if *self.inner.fail_appends.lock() {
            return Err(VitrineError::network("append rejected"));
        }
        let id = MessageId::new(Uuid::new_v4().to_string());
        message.id = Some(id.clone());
        self.with_channel(channel, |rec| rec.messages.push(message))?;
        self.publish_messages(channel);
        Ok(id)
    }

    async fn update_last_message(&self, channel: &ChannelId, message: &ChatMessage) -> Result<()> {
        self.with_channel(channel, |rec| {
            rec.summary.last_message = Some(message.clone());
            rec.summary.last_active_ms = Some(message.timestamp_ms);
        })?;
        self.publish_channels();
        Ok(())
    }

    async fn mark_delivered(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        uid: &UserId,
        at_ms: i64,
    ) -> Result<()> {
        let found = self.with_channel(channel, |rec| {
            let mut found = false;
            for msg in &mut rec.messages {
                if msg.id.as_ref() == Some(message) {
                    msg.delivered_to.insert(uid.clone(), at_ms);
                    found = true;
                }
            }
            // The summary's last-message pointer carries receipts too.
            if let Some(last) = &mut rec.summary.last_message {
                if last.id.as_ref() == Some(message) {
                    last.delivered_to.insert(uid.clone(), at_ms);
                }
            }
            found
        })?;
        if !found {
            return Err(VitrineError::not_found(format!("message {message}")));
        }
        self.publish_messages(channel);
        self.publish_channels();
        Ok(())
    }

    async fn set_last_seen(&self, channel: &ChannelId, uid: &UserId, at_ms: i64) -> Result<()> {
        self.with_channel(channel, |rec| {
            rec.summary.last_seen.insert(uid.clone(), at_ms);
        })?;
        self.publish_channels();
        Ok(())
    }

    async fn create_channel(&self, summary: ChannelSummary) -> Result<ChannelId> {
        let id = summary.id.clone();
        let mut channels = self.inner.channels.lock();
        if channels.contains_key(&id) {
            return Err(VitrineError::invalid(format!("channel {id} already exists")));
        }
        channels.insert(
            id.clone(),
            ChannelRecord {
                summary,
                messages: Vec::new(),
            },
        );
        drop(channels);
        self.publish_channels();
        Ok(id)
    }

    async fn set_presence(&self, uid: &UserId, status: PresenceStatus) -> Result<()> {
        self.inner.presence.lock().insert(uid.clone(), status);
        self.publish_presence();
        Ok(())
    }

    async fn presence(&self) -> Dynamic<Snapshot<(UserId, PresenceStatus)>> {
        let snapshot: Vec<(UserId, PresenceStatus)> = self
            .inner
            .presence
            .lock()
            .iter()
            .map(|(uid, status)| (uid.clone(), status.clone()))
            .collect();
        let mut out = self.inner.presence_out.lock();
        out.get_or_insert_with(|| Dynamic::new(Ok(snapshot))).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::types::{ChannelKind, MessageKind};

    fn summary(id: &str) -> ChannelSummary {
        ChannelSummary {
            id: ChannelId::new(id),
            name: id.to_owned(),
            kind: ChannelKind::Public,
            description: String::new(),
            members: Vec::new(),
            last_message: None,
            last_seen: Default::default(),
            last_active_ms: None,
        }
    }

    fn message(text: &str, at_ms: i64) -> ChatMessage {
        ChatMessage {
            id: None,
            sender: UserId::new("u1"),
            sender_name: "Sam".to_owned(),
            sender_photo: None,
            text: text.to_owned(),
            kind: MessageKind::Text,
            timestamp_ms: at_ms,
            mentions: Vec::new(),
            delivered_to: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_send_message_appends_and_moves_pointer() {
        let store = MemoryChannelStore::new();
        store.seed_channel(summary("general"));
        let channels = store.channels().await;
        let messages = store.watch_messages(&ChannelId::new("general")).await;

        let id = store
            .send_message(&ChannelId::new("general"), message("hi", 100))
            .await
            .unwrap();

        let log = messages.get().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].id.as_ref(), Some(&id));

        let snapshot = channels.get().unwrap();
        let last = snapshot[0].last_message.as_ref().unwrap();
        assert_eq!(last.text, "hi");
        assert_eq!(snapshot[0].last_active_ms, Some(100));
    }

    #[tokio::test]
    async fn test_failed_append_leaves_no_trace() {
        let store = MemoryChannelStore::new();
        store.seed_channel(summary("general"));
        let channels = store.channels().await;

        store.fail_appends(true);
        let result = store
            .send_message(&ChannelId::new("general"), message("lost", 100))
            .await;
        assert!(result.is_err());

        let snapshot = channels.get().unwrap();
        assert!(snapshot[0].last_message.is_none());
    }

    #[tokio::test]
    async fn test_mark_delivered_and_last_seen() {
        let store = MemoryChannelStore::new();
        store.seed_channel(summary("general"));
        let channel = ChannelId::new("general");
        let id = store
            .send_message(&channel, message("hi", 100))
            .await
            .unwrap();

        store
            .mark_delivered(&channel, &id, &UserId::new("u2"), 150)
            .await
            .unwrap();
        store
            .set_last_seen(&channel, &UserId::new("u2"), 150)
            .await
            .unwrap();

        let snapshot = store.channels().await.get().unwrap();
        let last = snapshot[0].last_message.as_ref().unwrap();
        assert!(last.delivered_to_user(&UserId::new("u2")));
        assert_eq!(snapshot[0].last_seen_ms(&UserId::new("u2")), 150);
    }

    #[tokio::test]
    async fn test_create_channel_rejects_duplicates() {
        let store = MemoryChannelStore::new();
        store.create_channel(summary("general")).await.unwrap();
        assert!(store.create_channel(summary("general")).await.is_err());
    }
}
