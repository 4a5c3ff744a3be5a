//! Normalized chat shapes
//!
//! The realtime store delivers channel summaries as loosely-typed trees
//! (members as either an array or a keyed map, optional last-message pointers,
//! server-stamped timestamps). The channel-store handler normalizes all of
//! that at the boundary; everything above it works with these types.

use crate::types::identifiers::{ChannelId, MessageId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of chat channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Open to every team member
    #[default]
    Public,
    /// Direct message between two users
    Dm,
    /// Invite-only group
    Group,
}

/// Kind of chat message payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Plain text
    #[default]
    Text,
    /// An uploaded image; `text` holds the URL
    Image,
    /// Channel housekeeping ("x joined", ...)
    System,
}

/// A single chat message, also used as a channel's last-message pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message key within the channel; absent until the store assigns one
    pub id: Option<MessageId>,
    /// Author uid
    pub sender: UserId,
    /// Author display name at send time
    pub sender_name: String,
    /// Author avatar URL at send time
    pub sender_photo: Option<String>,
    /// Message text (or image URL for [`MessageKind::Image`])
    pub text: String,
    /// Payload kind
    pub kind: MessageKind,
    /// Epoch millis assigned by the store
    pub timestamp_ms: i64,
    /// Uids mentioned in the message
    #[serde(default)]
    pub mentions: Vec<UserId>,
    /// Delivery receipts: uid -> epoch millis the message reached that device
    #[serde(default)]
    pub delivered_to: HashMap<UserId, i64>,
}

impl ChatMessage {
    /// A short display body for notification surfaces: the text itself, or a
    /// placeholder for non-text payloads.
    pub fn display_body(&self) -> String {
        if !self.text.is_empty() && self.kind != MessageKind::Image {
            return self.text.clone();
        }
        match self.kind {
            MessageKind::Image => "Sent an image".to_owned(),
            _ => "New message".to_owned(),
        }
    }

    /// Whether this message mentions the given user
    pub fn mentions_user(&self, uid: &UserId) -> bool {
        self.mentions.iter().any(|m| m == uid)
    }

    /// Whether delivery to the given user has been recorded
    pub fn delivered_to_user(&self, uid: &UserId) -> bool {
        self.delivered_to.contains_key(uid)
    }
}

/// Live summary of one chat channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    /// Channel key
    pub id: ChannelId,
    /// Channel name (without the leading `#`)
    pub name: String,
    /// Channel kind
    pub kind: ChannelKind,
    /// Optional topic/description
    #[serde(default)]
    pub description: String,
    /// Member uids; empty for public channels (everyone is a member)
    #[serde(default)]
    pub members: Vec<UserId>,
    /// Pointer to the most recent message, if any
    pub last_message: Option<ChatMessage>,
    /// Per-user read horizon: uid -> epoch millis of the last message seen
    #[serde(default)]
    pub last_seen: HashMap<UserId, i64>,
    /// Epoch millis of the last activity in the channel
    pub last_active_ms: Option<i64>,
}

impl ChannelSummary {
    /// Whether the given user can see this channel: public channels are open
    /// to everyone, otherwise membership is required.
    pub fn is_member(&self, uid: &UserId) -> bool {
        self.kind == ChannelKind::Public || self.members.iter().any(|m| m == uid)
    }

    /// Read horizon for the given user; a user with no recorded horizon has
    /// seen nothing (epoch 0).
    pub fn last_seen_ms(&self, uid: &UserId) -> i64 {
        self.last_seen.get(uid).copied().unwrap_or(0)
    }

    /// Display title for notification surfaces: the sender's name for DMs,
    /// `#name` for everything else.
    pub fn notification_title(&self) -> String {
        match (&self.kind, &self.last_message) {
            (ChannelKind::Dm, Some(msg)) if !msg.sender_name.is_empty() => {
                msg.sender_name.clone()
            }
            (ChannelKind::Dm, _) => "DM".to_owned(),
            _ => format!("#{}", self.name),
        }
    }
}

/// Online/offline presence state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceState {
    Online,
    Offline,
}

/// A user's presence record in the realtime store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceStatus {
    /// Current state
    pub state: PresenceState,
    /// Epoch millis of the last state change
    pub last_changed_ms: i64,
}
