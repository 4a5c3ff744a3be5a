//! Combine-latest over both adapter outputs.

use crate::views::{aggregate, AggregatedFeed, NotificationRecord};
use vitrine_core::reactive::{Dynamic, Subscription};

/// Holds the latest record list from each adapter and republishes the
/// combined feed whenever either side moves. Last-write-wins per side; a
/// side that has not emitted contributes whatever it last published (its
/// initial empty list before first data).
pub struct NotificationAggregator {
    chat: Subscription<Vec<NotificationRecord>>,
    system: Subscription<Vec<NotificationRecord>>,
    output: Dynamic<AggregatedFeed>,
}

impl NotificationAggregator {
    /// Subscribe to both adapter outputs.
    pub fn new(
        chat: &Dynamic<Vec<NotificationRecord>>,
        system: &Dynamic<Vec<NotificationRecord>>,
    ) -> Self {
        let chat = chat.subscribe();
        let system = system.subscribe();
        let output = Dynamic::new(aggregate(&chat.get(), &system.get()));
        Self {
            chat,
            system,
            output,
        }
    }

    /// Recombine if either side changed since the last pump.
    pub fn pump(&mut self) {
        let chat_moved = self.chat.poll().is_some();
        let system_moved = self.system.poll().is_some();
        if chat_moved || system_moved {
            self.output
                .set(aggregate(&self.chat.get(), &self.system.get()));
        }
    }

    /// Handle onto the combined feed.
    pub fn feed(&self) -> Dynamic<AggregatedFeed> {
        self.output.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{NotificationKind, NotificationSource};
    use vitrine_core::types::NotificationId;

    fn record(id: &str, source: NotificationSource, ts: i64) -> NotificationRecord {
        NotificationRecord {
            id: NotificationId::new(id),
            source,
            kind: NotificationKind::Message,
            title: String::new(),
            body: String::new(),
            actor_avatar_url: None,
            timestamp_ms: Some(ts),
            is_read: false,
            route_hint: None,
        }
    }

    #[test]
    fn test_pump_recombines_on_either_side() {
        let chat = Dynamic::new(Vec::new());
        let system = Dynamic::new(Vec::new());
        let mut agg = NotificationAggregator::new(&chat, &system);
        let feed = agg.feed();
        assert!(feed.get().records.is_empty());

        chat.set(vec![
            record("c1", NotificationSource::Chat, 100),
            record("c2", NotificationSource::Chat, 300),
        ]);
        agg.pump();
        assert_eq!(feed.get().records.len(), 2);

        system.set(vec![
            record("s1", NotificationSource::System, 200),
            record("s2", NotificationSource::System, 400),
        ]);
        agg.pump();

        let order: Vec<i64> = feed
            .get()
            .records
            .iter()
            .filter_map(|r| r.timestamp_ms)
            .collect();
        assert_eq!(order, vec![400, 300, 200, 100]);
        assert_eq!(feed.get().unread_count, 4);
    }

    #[test]
    fn test_side_replacement_is_last_write_wins() {
        let chat = Dynamic::new(vec![record("c1", NotificationSource::Chat, 100)]);
        let system = Dynamic::new(Vec::new());
        let mut agg = NotificationAggregator::new(&chat, &system);

        chat.set(vec![record("c9", NotificationSource::Chat, 900)]);
        agg.pump();

        let feed = agg.feed().get();
        assert_eq!(feed.records.len(), 1);
        assert_eq!(feed.records[0].id, NotificationId::new("c9"));
    }

    #[test]
    fn test_pump_without_changes_is_quiet() {
        let chat = Dynamic::new(Vec::new());
        let system = Dynamic::new(Vec::new());
        let mut agg = NotificationAggregator::new(&chat, &system);
        let feed = agg.feed();
        let version_before = feed.version();
        agg.pump();
        assert_eq!(feed.version(), version_before);
    }
}
