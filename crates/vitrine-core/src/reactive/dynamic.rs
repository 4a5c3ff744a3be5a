//! `Dynamic<T>`: a shared value with version-counted change detection.
//!
//! Built on std primitives only (`RwLock` + `AtomicU64`) so that both sync
//! and async code can observe it. Subscriptions are poll-based: a consumer
//! that polls late sees only the latest value, never a backlog, which is the
//! right semantics for snapshot-style sources (the feed always wants the
//! current channel list, not every intermediate one).

// RwLock poisoning only happens if a writer panicked; there is no sensible
// recovery, so expect() is the handling pattern here.
#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

struct Shared<T> {
    value: RwLock<T>,
    /// Incremented on every `set`; subscriptions compare against it.
    version: AtomicU64,
}

/// A shared observable value.
///
/// Cloning a `Dynamic` clones the handle, not the value: all clones see the
/// same state. Writers call [`Dynamic::set`] or [`Dynamic::update`];
/// observers call [`Dynamic::subscribe`] and poll the returned
/// [`Subscription`].
#[derive(Clone)]
pub struct Dynamic<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Clone + Send + Sync + 'static> Dynamic<T> {
    /// Create a new `Dynamic` holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: RwLock::new(value),
                version: AtomicU64::new(0),
            }),
        }
    }

    /// Clone out the current value.
    pub fn get(&self) -> T {
        self.shared
            .value
            .read()
            .expect("Dynamic lock poisoned")
            .clone()
    }

    /// Replace the value and bump the version.
    pub fn set(&self, value: T) {
        {
            let mut guard = self.shared.value.write().expect("Dynamic lock poisoned");
            *guard = value;
        }
        self.shared.version.fetch_add(1, Ordering::Release);
    }

    /// Replace the value by applying `f` to the current one.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(T) -> T,
    {
        let next = f(self.get());
        self.set(next);
    }

    /// Current version counter. Starts at 0 and increments on every `set`.
    pub fn version(&self) -> u64 {
        self.shared.version.load(Ordering::Acquire)
    }

    /// Start observing changes from this point on.
    ///
    /// The subscription starts caught-up: its first [`Subscription::poll`]
    /// returns `None` until the value is set again.
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            shared: self.shared.clone(),
            seen_version: self.shared.version.load(Ordering::Acquire),
        }
    }
}

impl<T: Clone + Send + Sync + Default + 'static> Default for Dynamic<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Send + Sync + std::fmt::Debug + 'static> std::fmt::Debug for Dynamic<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dynamic")
            .field("value", &self.get())
            .field("version", &self.version())
            .finish()
    }
}

/// A polling handle onto a [`Dynamic`].
///
/// Tracks the last version it observed. Intermediate values written between
/// polls are coalesced; only the latest survives.
pub struct Subscription<T> {
    shared: Arc<Shared<T>>,
    seen_version: u64,
}

impl<T: Clone + Send + Sync + 'static> Subscription<T> {
    /// Whether the source changed since the last poll.
    pub fn has_changed(&self) -> bool {
        self.shared.version.load(Ordering::Acquire) > self.seen_version
    }

    /// Return the latest value if it changed since the last poll, marking it
    /// seen. Returns `None` when nothing changed.
    pub fn poll(&mut self) -> Option<T> {
        let current = self.shared.version.load(Ordering::Acquire);
        if current > self.seen_version {
            self.seen_version = current;
            Some(
                self.shared
                    .value
                    .read()
                    .expect("Dynamic lock poisoned")
                    .clone(),
            )
        } else {
            None
        }
    }

    /// Clone out the current value without affecting change tracking.
    pub fn get(&self) -> T {
        self.shared
            .value
            .read()
            .expect("Dynamic lock poisoned")
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_update() {
        let d = Dynamic::new(1);
        assert_eq!(d.get(), 1);
        d.set(2);
        assert_eq!(d.get(), 2);
        d.update(|x| x * 10);
        assert_eq!(d.get(), 20);
    }

    #[test]
    fn test_clones_share_state() {
        let a = Dynamic::new(String::new());
        let b = a.clone();
        a.set("shared".to_owned());
        assert_eq!(b.get(), "shared");
    }

    #[test]
    fn test_version_increments_on_set() {
        let d = Dynamic::new(0);
        assert_eq!(d.version(), 0);
        d.set(1);
        d.set(2);
        assert_eq!(d.version(), 2);
    }

    #[test]
    fn test_subscription_starts_caught_up() {
        let d = Dynamic::new(5);
        let mut sub = d.subscribe();
        assert_eq!(sub.poll(), None);
        assert_eq!(sub.get(), 5);
    }

    #[test]
    fn test_poll_marks_seen() {
        let d = Dynamic::new(0);
        let mut sub = d.subscribe();

        d.set(1);
        assert!(sub.has_changed());
        assert_eq!(sub.poll(), Some(1));
        assert!(!sub.has_changed());
        assert_eq!(sub.poll(), None);
    }

    #[test]
    fn test_poll_coalesces_intermediate_values() {
        let d = Dynamic::new(0);
        let mut sub = d.subscribe();

        d.set(1);
        d.set(2);
        d.set(3);
        assert_eq!(sub.poll(), Some(3));
        assert_eq!(sub.poll(), None);
    }

    #[test]
    fn test_independent_subscribers() {
        let d = Dynamic::new(0);
        let mut early = d.subscribe();
        d.set(7);
        let mut late = d.subscribe();

        assert_eq!(early.poll(), Some(7));
        assert_eq!(late.poll(), None);
    }

    #[test]
    fn test_shared_across_threads() {
        let d = Dynamic::new(0u64);
        let writer = d.clone();
        let handle = std::thread::spawn(move || {
            for i in 1..=100 {
                writer.set(i);
            }
        });
        handle.join().unwrap();
        assert_eq!(d.get(), 100);
    }
}
