//! Chat actions: sending, channel management, read state, presence.

use crate::errors::AppError;
use std::sync::Arc;
use vitrine_core::effects::{ChannelStore, Clock};
use vitrine_core::types::{
    ChannelId, ChannelKind, ChannelSummary, ChatMessage, MessageId, MessageKind, PresenceState,
    PresenceStatus, UserId, UserProfile,
};

/// User-initiated chat operations for the signed-in user.
pub struct ChatWorkflow {
    store: Arc<dyn ChannelStore>,
    clock: Arc<dyn Clock>,
    me: UserProfile,
}

impl ChatWorkflow {
    /// Bind the store and clock to the signed-in user.
    pub fn new(store: Arc<dyn ChannelStore>, clock: Arc<dyn Clock>, me: UserProfile) -> Self {
        Self { store, clock, me }
    }

    /// Send a text message, optionally mentioning users.
    pub async fn send_message(
        &self,
        channel: &ChannelId,
        text: impl Into<String>,
        mentions: Vec<UserId>,
    ) -> Result<MessageId, AppError> {
        self.send(channel, text.into(), MessageKind::Text, mentions)
            .await
    }

    /// Send an uploaded image by URL.
    pub async fn send_image(
        &self,
        channel: &ChannelId,
        image_url: impl Into<String>,
    ) -> Result<MessageId, AppError> {
        self.send(channel, image_url.into(), MessageKind::Image, Vec::new())
            .await
    }

    async fn send(
        &self,
        channel: &ChannelId,
        text: String,
        kind: MessageKind,
        mentions: Vec<UserId>,
    ) -> Result<MessageId, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::input("Empty message", "Type a message first"));
        }
        let message = ChatMessage {
            id: None,
            sender: self.me.uid.clone(),
            sender_name: self.me.display_name.clone(),
            sender_photo: self.me.photo_url.clone(),
            text,
            kind,
            timestamp_ms: self.clock.now_ms(),
            mentions,
            delivered_to: Default::default(),
        };
        self.store
            .send_message(channel, message)
            .await
            .map_err(|err| AppError::action("Send message", err))
    }

    /// Create a channel. The creator is always a member.
    pub async fn create_channel(
        &self,
        id: &ChannelId,
        name: impl Into<String>,
        kind: ChannelKind,
        mut members: Vec<UserId>,
        description: impl Into<String>,
    ) -> Result<ChannelId, AppError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::input("Channel needs a name", "Give it a name"));
        }
        if !members.contains(&self.me.uid) {
            members.push(self.me.uid.clone());
        }
        let summary = ChannelSummary {
            id: id.clone(),
            name,
            kind,
            description: description.into(),
            members,
            last_message: None,
            last_seen: Default::default(),
            last_active_ms: Some(self.clock.now_ms()),
        };
        self.store
            .create_channel(summary)
            .await
            .map_err(|err| AppError::action("Create channel", err))
    }

    /// Open a channel: advances the read horizon to now, which is what turns
    /// its feed record read.
    pub async fn open_channel(&self, channel: &ChannelId) -> Result<(), AppError> {
        self.store
            .set_last_seen(channel, &self.me.uid, self.clock.now_ms())
            .await
            .map_err(|err| AppError::action("Open channel", err))
    }

    /// Publish presence with a last-changed stamp.
    pub async fn set_presence(&self, state: PresenceState) -> Result<(), AppError> {
        let status = PresenceStatus {
            state,
            last_changed_ms: self.clock.now_ms(),
        };
        self.store
            .set_presence(&self.me.uid, status)
            .await
            .map_err(|err| AppError::action("Update presence", err))
    }
}
