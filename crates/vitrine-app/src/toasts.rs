//! Transient toast queue.
//!
//! Three shapes of toast: plain standard toasts that auto-dismiss after five
//! seconds, action-bearing toasts (including confirm prompts) that stay until
//! acted on, and rich chat notifications with reply/click handlers that
//! auto-dismiss after twelve seconds. Expiry is clock-driven: the hosting
//! shell calls [`ToastQueue::sweep`] from its tick, and every queue operation
//! stays synchronous apart from [`ToastQueue::reply`].

use crate::errors::AppError;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;
use vitrine_core::effects::Clock;

/// Auto-dismiss delay for plain standard toasts.
pub const STANDARD_TOAST_TTL_MS: i64 = 5_000;
/// Auto-dismiss delay for rich chat toasts.
pub const RICH_TOAST_TTL_MS: i64 = 12_000;
/// Queue capacity; beyond it the oldest auto-dismissable entry is evicted.
const MAX_TOASTS: usize = 16;

/// Severity of a standard toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    /// Glyph for rendering.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Info => "ℹ",
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Error => "✗",
        }
    }
}

/// Identifier of a queued toast.
pub type ToastId = Uuid;

/// Callback of an action-bearing standard toast.
pub type ActionFn = Arc<dyn Fn() + Send + Sync>;
/// Reply handler of a rich toast; receives the drafted text.
pub type ReplyFn =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<(), AppError>> + Send + Sync>;
/// Click handler of a rich toast.
pub type ClickFn = Arc<dyn Fn() + Send + Sync>;

/// A labelled button on a standard toast.
#[derive(Clone)]
pub struct ToastAction {
    /// Button label
    pub label: String,
    /// Invoked by [`ToastQueue::activate`]
    pub on_activate: ActionFn,
}

/// A rich chat-notification toast.
#[derive(Clone)]
pub struct RichNotification {
    /// Primary line (sender or "Mentioned by ..." form)
    pub title: String,
    /// Secondary line (channel context)
    pub subtitle: String,
    /// Message preview
    pub body: String,
    /// Sender avatar
    pub avatar_url: Option<String>,
    /// Sender role line, if the caller knows one
    pub role: Option<String>,
    /// Inline reply handler; absent hides the reply control
    pub on_reply: Option<ReplyFn>,
    /// Invoked by [`ToastQueue::click`]
    pub on_click: Option<ClickFn>,
}

#[derive(Clone)]
enum Payload {
    Standard {
        message: String,
        level: ToastLevel,
        action: Option<ToastAction>,
    },
    Rich {
        notification: RichNotification,
        reply_pending: bool,
    },
}

#[derive(Clone)]
struct ToastEntry {
    id: ToastId,
    created_at_ms: i64,
    expires_at_ms: Option<i64>,
    payload: Payload,
}

/// Callback-free projection of one queued toast, for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum ToastView {
    /// A standard toast
    Standard {
        id: ToastId,
        message: String,
        level: ToastLevel,
        /// Button label, if the toast carries an action
        action_label: Option<String>,
    },
    /// A rich chat toast
    Rich {
        id: ToastId,
        title: String,
        subtitle: String,
        body: String,
        avatar_url: Option<String>,
        role: Option<String>,
        /// Whether the reply control should be shown
        can_reply: bool,
        /// Whether a reply is in flight (control disabled)
        reply_pending: bool,
    },
}

/// The toast queue. Cheap to clone; clones share the same queue.
#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<Inner>,
}

struct Inner {
    clock: Arc<dyn Clock>,
    entries: Mutex<Vec<ToastEntry>>,
}

impl ToastQueue {
    /// An empty queue expiring entries against the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                clock,
                entries: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Enqueue a standard toast. Plain toasts expire after
    /// [`STANDARD_TOAST_TTL_MS`]; action-bearing toasts stay until activated
    /// or removed.
    pub fn push_standard(
        &self,
        message: impl Into<String>,
        level: ToastLevel,
        action: Option<ToastAction>,
    ) -> ToastId {
        let now = self.inner.clock.now_ms();
        let expires = action.is_none().then_some(now + STANDARD_TOAST_TTL_MS);
        self.push_entry(ToastEntry {
            id: Uuid::new_v4(),
            created_at_ms: now,
            expires_at_ms: expires,
            payload: Payload::Standard {
                message: message.into(),
                level,
                action,
            },
        })
    }

    /// Enqueue a confirm prompt: a warning-level toast whose single action
    /// runs `on_confirm`. Never auto-dismisses.
    pub fn push_confirm(
        &self,
        message: impl Into<String>,
        label: impl Into<String>,
        on_confirm: ActionFn,
    ) -> ToastId {
        self.push_standard(
            message,
            ToastLevel::Warning,
            Some(ToastAction {
                label: label.into(),
                on_activate: on_confirm,
            }),
        )
    }

    /// Enqueue a rich chat toast, expiring after [`RICH_TOAST_TTL_MS`].
    pub fn push_rich(&self, notification: RichNotification) -> ToastId {
        let now = self.inner.clock.now_ms();
        self.push_entry(ToastEntry {
            id: Uuid::new_v4(),
            created_at_ms: now,
            expires_at_ms: Some(now + RICH_TOAST_TTL_MS),
            payload: Payload::Rich {
                notification,
                reply_pending: false,
            },
        })
    }

    fn push_entry(&self, entry: ToastEntry) -> ToastId {
        let id = entry.id;
        let mut entries = self.inner.entries.lock();
        if entries.len() >= MAX_TOASTS {
            // Evict the oldest auto-dismissable entry; action/confirm toasts
            // are never silently dropped.
            if let Some(pos) = entries.iter().position(|e| e.expires_at_ms.is_some()) {
                entries.remove(pos);
            }
        }
        entries.push(entry);
        id
    }

    /// Run an action toast's callback and remove it. No-op on unknown ids or
    /// actionless toasts.
    pub fn activate(&self, id: ToastId) {
        let action = {
            let mut entries = self.inner.entries.lock();
            let Some(pos) = entries.iter().position(|e| e.id == id) else {
                return;
            };
            match &entries[pos].payload {
                Payload::Standard {
                    action: Some(action),
                    ..
                } => {
                    let action = action.on_activate.clone();
                    entries.remove(pos);
                    action
                }
                _ => return,
            }
        };
        action();
    }

    /// Run a rich toast's click handler and remove it. The entry is removed
    /// even when it has no handler (clicking dismisses).
    pub fn click(&self, id: ToastId) {
        let handler = {
            let mut entries = self.inner.entries.lock();
            let Some(pos) = entries.iter().position(|e| e.id == id) else {
                return;
            };
            match &entries[pos].payload {
                Payload::Rich { notification, .. } => {
                    let handler = notification.on_click.clone();
                    entries.remove(pos);
                    handler
                }
                Payload::Standard { .. } => return,
            }
        };
        if let Some(handler) = handler {
            handler();
        }
    }

    /// Send an inline reply from a rich toast.
    ///
    /// While the reply is in flight the entry is marked pending and further
    /// replies on it are rejected. On success the entry is removed; on
    /// failure it stays, the control re-enables, and the error is returned
    /// (the caller keeps the draft text).
    pub async fn reply(&self, id: ToastId, text: String) -> Result<(), AppError> {
        let handler = {
            let mut entries = self.inner.entries.lock();
            let entry = entries
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| AppError::internal("toasts", "reply target no longer queued"))?;
            match &mut entry.payload {
                Payload::Rich {
                    notification,
                    reply_pending,
                } => {
                    if *reply_pending {
                        return Err(AppError::input(
                            "Reply already sending",
                            "Wait for the current reply to finish",
                        ));
                    }
                    let Some(handler) = notification.on_reply.clone() else {
                        return Err(AppError::internal("toasts", "toast has no reply handler"));
                    };
                    *reply_pending = true;
                    handler
                }
                Payload::Standard { .. } => {
                    return Err(AppError::internal("toasts", "standard toast cannot reply"))
                }
            }
        };

        let result = handler(text).await;

        let mut entries = self.inner.entries.lock();
        match &result {
            Ok(()) => entries.retain(|e| e.id != id),
            Err(err) => {
                tracing::warn!(toast = %id, error = %err, "reply failed; keeping toast");
                if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
                    if let Payload::Rich { reply_pending, .. } = &mut entry.payload {
                        *reply_pending = false;
                    }
                }
            }
        }
        result
    }

    /// Remove a toast. Idempotent.
    pub fn remove(&self, id: ToastId) {
        self.inner.entries.lock().retain(|e| e.id != id);
    }

    /// Drop expired entries. Entries with a reply in flight are kept even
    /// past their deadline so an in-progress reply never loses its toast.
    pub fn sweep(&self) {
        let now = self.inner.clock.now_ms();
        self.inner.entries.lock().retain(|e| {
            if let Payload::Rich {
                reply_pending: true,
                ..
            } = e.payload
            {
                return true;
            }
            match e.expires_at_ms {
                Some(deadline) => now < deadline,
                None => true,
            }
        });
    }

    /// Snapshot for rendering, in queue order (oldest first).
    pub fn snapshot(&self) -> Vec<ToastView> {
        self.inner
            .entries
            .lock()
            .iter()
            .map(|e| match &e.payload {
                Payload::Standard {
                    message,
                    level,
                    action,
                } => ToastView::Standard {
                    id: e.id,
                    message: message.clone(),
                    level: *level,
                    action_label: action.as_ref().map(|a| a.label.clone()),
                },
                Payload::Rich {
                    notification,
                    reply_pending,
                } => ToastView::Rich {
                    id: e.id,
                    title: notification.title.clone(),
                    subtitle: notification.subtitle.clone(),
                    body: notification.body.clone(),
                    avatar_url: notification.avatar_url.clone(),
                    role: notification.role.clone(),
                    can_reply: notification.on_reply.is_some(),
                    reply_pending: *reply_pending,
                },
            })
            .collect()
    }

    /// Number of queued toasts.
    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

    #[derive(Default)]
    struct TestClock(AtomicI64);

    impl Clock for TestClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl TestClock {
        fn advance(&self, ms: i64) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    fn queue() -> (ToastQueue, Arc<TestClock>) {
        let clock = Arc::new(TestClock::default());
        (ToastQueue::new(clock.clone()), clock)
    }

    fn rich(on_reply: Option<ReplyFn>) -> RichNotification {
        RichNotification {
            title: "Sam".to_owned(),
            subtitle: "#general".to_owned(),
            body: "hi".to_owned(),
            avatar_url: None,
            role: None,
            on_reply,
            on_click: None,
        }
    }

    #[test]
    fn test_standard_toast_expires_after_5s() {
        let (queue, clock) = queue();
        queue.push_standard("Saved", ToastLevel::Success, None);

        clock.advance(4_999);
        queue.sweep();
        assert_eq!(queue.len(), 1);

        clock.advance(1);
        queue.sweep();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_rich_toast_expires_after_12s() {
        let (queue, clock) = queue();
        queue.push_rich(rich(None));

        clock.advance(11_999);
        queue.sweep();
        assert_eq!(queue.len(), 1);

        clock.advance(1);
        queue.sweep();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_confirm_toast_never_expires() {
        let (queue, clock) = queue();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let id = queue.push_confirm("Delete page?", "Delete", Arc::new(move || {
            flag.store(true, Ordering::SeqCst);
        }));

        clock.advance(1_000_000);
        queue.sweep();
        assert_eq!(queue.len(), 1);

        queue.activate(id);
        assert!(fired.load(Ordering::SeqCst));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest_dismissable_never_confirms() {
        let (queue, _clock) = queue();
        let confirm_id = queue.push_confirm("Sure?", "Yes", Arc::new(|| {}));
        for i in 0..MAX_TOASTS {
            queue.push_standard(format!("t{i}"), ToastLevel::Info, None);
        }
        assert_eq!(queue.len(), MAX_TOASTS);
        let snapshot = queue.snapshot();
        assert!(snapshot.iter().any(|v| matches!(
            v,
            ToastView::Standard { id, .. } if *id == confirm_id
        )));
        // t0 was evicted to make room
        assert!(!snapshot
            .iter()
            .any(|v| matches!(v, ToastView::Standard { message, .. } if message == "t0")));
    }

    #[tokio::test]
    async fn test_reply_success_removes_entry() {
        let (queue, _clock) = queue();
        let id = queue.push_rich(rich(Some(Arc::new(|_text| {
            Box::pin(async { Ok(()) })
        }))));

        queue.reply(id, "on my way".to_owned()).await.unwrap();
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_reply_failure_keeps_entry_and_reenables() {
        let (queue, _clock) = queue();
        let id = queue.push_rich(rich(Some(Arc::new(|_text| {
            Box::pin(async {
                Err(AppError::action(
                    "Send reply",
                    vitrine_core::VitrineError::network("offline"),
                ))
            })
        }))));

        assert!(queue.reply(id, "hello".to_owned()).await.is_err());
        assert_eq!(queue.len(), 1);
        match &queue.snapshot()[0] {
            ToastView::Rich { reply_pending, .. } => assert!(!reply_pending),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reply_reentrancy_guard() {
        let (queue, _clock) = queue();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let rx = Arc::new(Mutex::new(Some(rx)));
        let id = queue.push_rich(rich(Some(Arc::new(move |_text| {
            let rx = rx.lock().take();
            Box::pin(async move {
                if let Some(rx) = rx {
                    let _ = rx.await;
                }
                Ok(())
            })
        }))));

        let first = tokio::spawn({
            let queue = queue.clone();
            async move { queue.reply(id, "first".to_owned()).await }
        });
        // Let the first reply reach its pending state.
        tokio::task::yield_now().await;
        while !matches!(
            queue.snapshot().first(),
            Some(ToastView::Rich { reply_pending: true, .. })
        ) {
            tokio::task::yield_now().await;
        }

        let second = queue.reply(id, "second".to_owned()).await;
        assert!(second.is_err());

        tx.send(()).ok();
        first.await.unwrap().unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (queue, _clock) = queue();
        let id = queue.push_standard("x", ToastLevel::Info, None);
        queue.remove(id);
        queue.remove(id);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_click_dismisses_and_fires_handler() {
        let (queue, _clock) = queue();
        let clicked = Arc::new(AtomicBool::new(false));
        let flag = clicked.clone();
        let mut notification = rich(None);
        notification.on_click = Some(Arc::new(move || {
            flag.store(true, Ordering::SeqCst);
        }));
        let id = queue.push_rich(notification);

        queue.click(id);
        assert!(clicked.load(Ordering::SeqCst));
        assert!(queue.is_empty());
    }
}
