//! Realtime channel store contract.
//!
//! Chat lives in a realtime key-value store: channel summaries, per-channel
//! message logs, presence. The store pushes whole snapshots; the aggregation
//! layer polls the returned `Dynamic`s.

use crate::effects::document_store::Snapshot;
use crate::errors::Result;
use crate::reactive::Dynamic;
use crate::types::{ChannelId, ChannelSummary, ChatMessage, MessageId, PresenceStatus, UserId};
use async_trait::async_trait;

/// Realtime chat store.
///
/// `send_message` is the one composite here: a send must both append to the
/// channel's log and move the channel's last-message pointer, and every
/// handler gets that pairing from the default implementation.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// Watch all channel summaries. Populated before returning.
    async fn channels(&self) -> Dynamic<Snapshot<ChannelSummary>>;

    /// Watch one channel's message log, oldest first.
    async fn watch_messages(&self, channel: &ChannelId) -> Dynamic<Snapshot<ChatMessage>>;

    /// Append a message to the channel log. The store assigns and returns the
    /// message id; the message's `id` field is ignored on the way in.
    async fn append_message(&self, channel: &ChannelId, message: ChatMessage)
        -> Result<MessageId>;

    /// Move the channel's last-message pointer and activity timestamp.
    async fn update_last_message(&self, channel: &ChannelId, message: &ChatMessage) -> Result<()>;

    /// Send a message: append it and advance the last-message pointer. Fails
    /// if either half fails; callers treat the send as not-happened on error.
    async fn send_message(&self, channel: &ChannelId, message: ChatMessage) -> Result<MessageId> {
        let id = self.append_message(channel, message.clone()).await?;
        let mut stamped = message;
        stamped.id = Some(id.clone());
        self.update_last_message(channel, &stamped).await?;
        Ok(id)
    }

    /// Record a delivery receipt for one user on one message.
    async fn mark_delivered(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        uid: &UserId,
        at_ms: i64,
    ) -> Result<()>;

    /// Advance a user's read horizon on a channel.
    async fn set_last_seen(&self, channel: &ChannelId, uid: &UserId, at_ms: i64) -> Result<()>;

    /// Create a channel from a summary; returns its id.
    async fn create_channel(&self, summary: ChannelSummary) -> Result<ChannelId>;

    /// Publish a user's presence record.
    async fn set_presence(&self, uid: &UserId, status: PresenceStatus) -> Result<()>;

    /// Watch all presence records.
    async fn presence(&self) -> Dynamic<Snapshot<(UserId, PresenceStatus)>>;
}

#[async_trait]
impl<T: ChannelStore + ?Sized> ChannelStore for std::sync::Arc<T> {
    async fn channels(&self) -> Dynamic<Snapshot<ChannelSummary>> {
        (**self).channels().await
    }

    async fn watch_messages(&self, channel: &ChannelId) -> Dynamic<Snapshot<ChatMessage>> {
        (**self).watch_messages(channel).await
    }

    async fn append_message(
        &self,
        channel: &ChannelId,
        message: ChatMessage,
    ) -> Result<MessageId> {
        (**self).append_message(channel, message).await
    }

    async fn update_last_message(
        &self,
        channel: &ChannelId,
        message: &ChatMessage,
    ) -> Result<()> {
        (**self).update_last_message(channel, message).await
    }

    async fn send_message(&self, channel: &ChannelId, message: ChatMessage) -> Result<MessageId> {
        (**self).send_message(channel, message).await
    }

    async fn mark_delivered(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        uid: &UserId,
        at_ms: i64,
    ) -> Result<()> {
        (**self).mark_delivered(channel, message, uid, at_ms).await
    }

    async fn set_last_seen(&self, channel: &ChannelId, uid: &UserId, at_ms: i64) -> Result<()> {
        (**self).set_last_seen(channel, uid, at_ms).await
    }

    async fn create_channel(&self, summary: ChannelSummary) -> Result<ChannelId> {
        (**self).create_channel(summary).await
    }

    async fn set_presence(&self, uid: &UserId, status: PresenceStatus) -> Result<()> {
        (**self).set_presence(uid, status).await
    }

    async fn presence(&self) -> Dynamic<Snapshot<(UserId, PresenceStatus)>> {
        (**self).presence().await
    }
}
