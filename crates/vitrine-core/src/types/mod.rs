//! Shared domain types
//!
//! Identifier newtypes and the normalized chat shapes that both the effect
//! handlers and the application core speak.

pub mod chat;
pub mod identifiers;

pub use chat::{ChannelKind, ChannelSummary, ChatMessage, MessageKind, PresenceState, PresenceStatus};
pub use identifiers::{ChannelId, Locale, MessageId, NotificationId, UserId, UserProfile};
