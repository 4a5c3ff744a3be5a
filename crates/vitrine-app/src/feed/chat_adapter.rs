//! Chat source adapter: channel snapshots in, notification records and rich
//! toasts out.

use crate::errors::AppError;
use crate::toasts::{ReplyFn, RichNotification, ToastQueue};
use crate::views::{NotificationKind, NotificationRecord, NotificationSource, RouteHint};
use std::collections::HashSet;
use std::sync::Arc;
use vitrine_core::effects::{ChannelStore, Clock};
use vitrine_core::reactive::{Dynamic, Subscription};
use vitrine_core::types::{
    ChannelKind, ChannelSummary, ChatMessage, MessageKind, NotificationId, UserProfile,
};

/// A message older than this on first observation never toasts; it shows up
/// in the feed only. Guards against a reconnect replaying the whole backlog
/// as popups.
pub const FRESH_TOAST_WINDOW_MS: i64 = 10_000;

/// Navigation callback invoked when a toast or record is clicked.
pub type NavigateFn = Arc<dyn Fn(RouteHint) + Send + Sync>;

/// Derives notification records from the channel store's live snapshot and
/// enqueues a rich toast the first time each fresh unread message is seen.
///
/// The notified set is keyed by message identity (channel + message id,
/// falling back to channel + timestamp) and lives for the adapter's lifetime,
/// so a message toasts at most once per session no matter how often the
/// snapshot re-delivers it.
pub struct ChatFeedAdapter {
    me: UserProfile,
    store: Arc<dyn ChannelStore>,
    clock: Arc<dyn Clock>,
    toasts: ToastQueue,
    navigate: Option<NavigateFn>,
    channels: Subscription<vitrine_core::effects::Snapshot<ChannelSummary>>,
    output: Dynamic<Vec<NotificationRecord>>,
    notified: HashSet<String>,
    primed: bool,
}

impl ChatFeedAdapter {
    /// Attach to the store's channel snapshot.
    pub async fn attach(
        store: Arc<dyn ChannelStore>,
        me: UserProfile,
        clock: Arc<dyn Clock>,
        toasts: ToastQueue,
        navigate: Option<NavigateFn>,
    ) -> Self {
        let channels = store.channels().await.subscribe();
        Self {
            me,
            store,
            clock,
            toasts,
            navigate,
            channels,
            output: Dynamic::new(Vec::new()),
            notified: HashSet::new(),
            primed: false,
        }
    }

    /// This adapter's record list. The aggregator subscribes to it.
    pub fn output(&self) -> &Dynamic<Vec<NotificationRecord>> {
        &self.output
    }

    /// Process the upstream snapshot if it changed. A degraded snapshot is
    /// logged and skipped; the last published records stand.
    pub async fn pump(&mut self) {
        let snapshot = if self.primed {
            match self.channels.poll() {
                Some(s) => s,
                None => return,
            }
        } else {
            self.primed = true;
            self.channels.get()
        };
        match snapshot {
            Ok(channels) => self.process(&channels).await,
            Err(err) => {
                tracing::warn!(error = %err, "chat source degraded; keeping last records");
            }
        }
    }

    async fn process(&mut self, channels: &[ChannelSummary]) {
        let now = self.clock.now_ms();
        let mut records = Vec::new();

        for channel in channels.iter().filter(|c| c.is_member(&self.me.uid)) {
            let Some(last) = &channel.last_message else {
                continue;
            };
            let is_read = last.sender == self.me.uid
                || last.timestamp_ms <= channel.last_seen_ms(&self.me.uid);

            records.push(NotificationRecord {
                id: NotificationId::new(channel.id.as_str()),
                source: NotificationSource::Chat,
                kind: NotificationKind::Message,
                title: channel.notification_title(),
                body: last.display_body(),
                actor_avatar_url: last.sender_photo.clone(),
                timestamp_ms: Some(last.timestamp_ms),
                is_read,
                route_hint: Some(RouteHint::Channel(channel.id.clone())),
            });

            if is_read || last.sender == self.me.uid {
                continue;
            }
            if now - last.timestamp_ms >= FRESH_TOAST_WINDOW_MS {
                continue;
            }
            let identity = match &last.id {
                Some(mid) => format!("{}/{}", channel.id, mid),
                None => format!("{}/{}", channel.id, last.timestamp_ms),
            };
            if !self.notified.insert(identity) {
                continue;
            }

            self.toasts.push_rich(self.build_toast(channel, last));

            // Best-effort delivery receipt; a failure costs nothing but the
            // receipt itself.
            if let Some(mid) = &last.id {
                if !last.delivered_to_user(&self.me.uid) {
                    if let Err(err) = self
                        .store
                        .mark_delivered(&channel.id, mid, &self.me.uid, now)
                        .await
                    {
                        tracing::debug!(channel = %channel.id, error = %err, "delivery receipt skipped");
                    }
                }
            }
        }

        self.output.set(records);
    }

    fn build_toast(&self, channel: &ChannelSummary, last: &ChatMessage) -> RichNotification {
        let sender = if last.sender_name.is_empty() {
            "Someone".to_owned()
        } else {
            last.sender_name.clone()
        };
        let title = if last.mentions_user(&self.me.uid) {
            format!("Mentioned by {sender}")
        } else {
            sender
        };
        let subtitle = match channel.kind {
            ChannelKind::Dm => "Direct message".to_owned(),
            _ => format!("#{}", channel.name),
        };

        let on_click = self.navigate.as_ref().map(|navigate| {
            let navigate = navigate.clone();
            let hint = RouteHint::Channel(channel.id.clone());
            let handler: Arc<dyn Fn() + Send + Sync> = Arc::new(move || navigate(hint.clone()));
            handler
        });

        RichNotification {
            title,
            subtitle,
            body: last.display_body(),
            avatar_url: last.sender_photo.clone(),
            role: None,
            on_reply: Some(self.reply_handler(channel)),
            on_click,
        }
    }

    fn reply_handler(&self, channel: &ChannelSummary) -> ReplyFn {
        let store = self.store.clone();
        let channel_id = channel.id.clone();
        let me = self.me.clone();
        let clock = self.clock.clone();
        Arc::new(move |text: String| {
            let store = store.clone();
            let channel_id = channel_id.clone();
            let me = me.clone();
            let clock = clock.clone();
            Box::pin(async move {
                if text.trim().is_empty() {
                    return Err(AppError::input("Empty reply", "Type a message first"));
                }
                let message = ChatMessage {
                    id: None,
                    sender: me.uid.clone(),
                    sender_name: me.display_name.clone(),
                    sender_photo: me.photo_url.clone(),
                    text,
                    kind: MessageKind::Text,
                    timestamp_ms: clock.now_ms(),
                    mentions: Vec::new(),
                    delivered_to: Default::default(),
                };
                store
                    .send_message(&channel_id, message)
                    .await
                    .map(|_| ())
                    .map_err(|err| AppError::action("Send reply", err))
            })
        })
    }
}
