//! Normalized notification records and the aggregated feed.

use serde::{Deserialize, Serialize};
use vitrine_core::types::{ChannelId, NotificationId};

/// Which live source a record came from.
///
/// Also the namespacing key of record ids: the two sources assign ids
/// independently, so a record's identity is always (source, id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationSource {
    /// Chat channel store
    Chat,
    /// Stored system notifications
    System,
}

/// Kind of notification, driving icon and severity in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Message,
    TaskAssigned,
    TaskUpdated,
    TaskCompleted,
    SystemAlert,
    /// Fallback for stored kinds this build does not recognize
    Other,
}

impl NotificationKind {
    /// Map a stored kind string; unrecognized values become [`Self::Other`],
    /// never an error.
    pub fn from_stored(raw: &str) -> Self {
        match raw {
            "message" => Self::Message,
            "task_assigned" => Self::TaskAssigned,
            "task_updated" => Self::TaskUpdated,
            "task_completed" => Self::TaskCompleted,
            "system_alert" => Self::SystemAlert,
            _ => Self::Other,
        }
    }

    /// Glyph for list rendering.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Message => "💬",
            Self::TaskAssigned => "📋",
            Self::TaskUpdated => "✏",
            Self::TaskCompleted => "✓",
            Self::SystemAlert => "⚠",
            Self::Other => "•",
        }
    }

    /// Fallback title when the stored document has none.
    pub fn default_title(&self) -> &'static str {
        match self {
            Self::Message => "New message",
            Self::TaskAssigned => "Task assigned",
            Self::TaskUpdated => "Task updated",
            Self::TaskCompleted => "Task completed",
            Self::SystemAlert => "System alert",
            Self::Other => "Notification",
        }
    }
}

/// Where clicking a record should take the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteHint {
    /// Open a chat channel
    Channel(ChannelId),
    /// Follow a stored link
    Url(String),
}

/// One entry of the aggregated notification feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Identity within `source`
    pub id: NotificationId,
    /// Originating source
    pub source: NotificationSource,
    /// Kind for icon/severity mapping
    pub kind: NotificationKind,
    /// Primary line
    pub title: String,
    /// Secondary line
    pub body: String,
    /// Avatar of the acting user, if known
    pub actor_avatar_url: Option<String>,
    /// Epoch millis; `None` renders as "recently" and sorts newest
    pub timestamp_ms: Option<i64>,
    /// Whether the current user has seen this
    pub is_read: bool,
    /// Click destination, if any
    pub route_hint: Option<RouteHint>,
}

/// The combined, ordered feed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregatedFeed {
    /// All records, newest first
    pub records: Vec<NotificationRecord>,
    /// Count of records with `is_read == false`
    pub unread_count: usize,
}

/// Combine both sources into one ordered feed.
///
/// Chat records come first in the pre-sort concatenation, so on equal
/// timestamps the stable sort keeps chat ahead of system. Records without a
/// timestamp sort as newest. No cross-source dedup: the same underlying
/// event surfacing in both sources appears twice, each under its own id.
pub fn aggregate(chat: &[NotificationRecord], system: &[NotificationRecord]) -> AggregatedFeed {
    let mut records: Vec<NotificationRecord> = Vec::with_capacity(chat.len() + system.len());
    records.extend_from_slice(chat);
    records.extend_from_slice(system);
    records.sort_by_key(|r| std::cmp::Reverse(r.timestamp_ms.unwrap_or(i64::MAX)));
    let unread_count = records.iter().filter(|r| !r.is_read).count();
    AggregatedFeed {
        records,
        unread_count,
    }
}
