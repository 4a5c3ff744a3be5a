//! The notification engine: source adapters plus the aggregator.
//!
//! Each adapter owns a subscription onto one live source and publishes
//! normalized [`NotificationRecord`](crate::views::NotificationRecord) lists;
//! the aggregator owns both outputs and publishes the combined feed. The
//! hosting shell drives everything by calling `pump` from its loop; nothing
//! here spawns tasks.

mod aggregator;
mod chat_adapter;
mod system_adapter;

pub use aggregator::NotificationAggregator;
pub use chat_adapter::{ChatFeedAdapter, NavigateFn, FRESH_TOAST_WINDOW_MS};
pub use system_adapter::{SystemFeedAdapter, SYSTEM_QUERY_LIMIT};

use crate::views::AggregatedFeed;
use vitrine_core::reactive::Dynamic;

/// The assembled engine: both adapters and the aggregator, pumped as one.
pub struct NotificationFeed {
    chat: ChatFeedAdapter,
    system: SystemFeedAdapter,
    aggregator: NotificationAggregator,
}

impl NotificationFeed {
    /// Wire adapters into an aggregator.
    pub fn new(chat: ChatFeedAdapter, system: SystemFeedAdapter) -> Self {
        let aggregator = NotificationAggregator::new(chat.output(), system.output());
        Self {
            chat,
            system,
            aggregator,
        }
    }

    /// Pump both adapters, then recombine. One call per shell tick.
    pub async fn pump(&mut self) {
        self.chat.pump().await;
        self.system.pump();
        self.aggregator.pump();
    }

    /// Handle onto the combined feed.
    pub fn feed(&self) -> Dynamic<AggregatedFeed> {
        self.aggregator.feed()
    }

    /// The system-side adapter, for `mark_read`.
    pub fn system(&self) -> &SystemFeedAdapter {
        &self.system
    }
}
