//! Stateful counter bound to one observation window on the query bus.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::{QueryCategory, QueryEvent};
use crate::services::classifier::QueryClassifier;
use crate::services::query_bus::{QueryBus, SubscriptionId};

#[derive(Debug, Default)]
struct Tally {
    by_category: HashMap<QueryCategory, u64>,
    by_name: HashMap<String, u64>,
}

impl Tally {
    fn record(&mut self, event: &QueryEvent) {
        for category in QueryClassifier::categorize(event) {
            if let Some(count) = self.by_category.get_mut(&category) {
                *count += 1;
            }
        }
        *self.by_name.entry(event.name.clone()).or_insert(0) += 1;
    }
}

/// Accumulates per-category and per-operation-name counts for every
/// event broadcast while its subscription is live.
///
/// A collector is single-use: a matcher creates one at construction
/// time (so queries issued between construction and block invocation
/// are also counted), reads it once after the block runs, then stops
/// it. `stop` is idempotent and also runs on `Drop`, so a panicking
/// block cannot leak a live subscription into later tests.
#[derive(Debug)]
pub struct QueryCollector {
    bus: QueryBus,
    tally: Arc<Mutex<Tally>>,
    subscription: Option<SubscriptionId>,
}

impl QueryCollector {
    /// Create a collector attached to `bus`, not yet listening.
    pub fn new(bus: &QueryBus) -> Self {
        let mut tally = Tally::default();
        for category in QueryCategory::ALL {
            tally.by_category.insert(category, 0);
        }
        Self {
            bus: bus.clone(),
            tally: Arc::new(Mutex::new(tally)),
            subscription: None,
        }
    }

    /// Begin receiving events. Idempotent: a second call while already
    /// listening is a no-op, so events are never double-counted.
    pub fn start(&mut self) {
        if self.subscription.is_some() {
            return;
        }
        let tally = Arc::clone(&self.tally);
        let id = self.bus.subscribe(move |event| {
            tracing::trace!(name = %event.name, "collector recording query event");
            tally
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .record(event);
        });
        self.subscription = Some(id);
    }

    /// Stop receiving events. Idempotent.
    pub fn stop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.bus.unsubscribe(id);
        }
    }

    /// Whether the collector currently holds a live subscription.
    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    /// Accumulated count for one category.
    ///
    /// Reading a count does not mutate it: repeated calls without new
    /// events return the same value.
    pub fn count_of(&self, category: QueryCategory) -> u64 {
        let tally = self
            .tally
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        tally.by_category.get(&category).copied().unwrap_or(0)
    }

    /// Accumulated count of events carrying exactly this operation
    /// name, independent of category. Returns 0 if never observed.
    pub fn calls_named(&self, name: &str) -> u64 {
        let tally = self
            .tally
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        tally.by_name.get(name).copied().unwrap_or(0)
    }
}

impl Drop for QueryCollector {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publish(bus: &QueryBus, name: &str, sql: &str) {
        bus.publish(&QueryEvent::new(name, sql));
    }

    #[test]
    fn test_counts_start_at_zero_for_every_category() {
        let bus = QueryBus::new();
        let collector = QueryCollector::new(&bus);
        for category in QueryCategory::ALL {
            assert_eq!(collector.count_of(category), 0);
        }
    }

    #[test]
    fn test_records_only_while_listening() {
        let bus = QueryBus::new();
        let mut collector = QueryCollector::new(&bus);

        publish(&bus, "Album Load", "SELECT 1");
        collector.start();
        publish(&bus, "Album Load", "SELECT 2");
        collector.stop();
        publish(&bus, "Album Load", "SELECT 3");

        assert_eq!(collector.count_of(QueryCategory::Load), 1);
        assert_eq!(collector.count_of(QueryCategory::Queries), 1);
    }

    #[test]
    fn test_start_is_idempotent() {
        let bus = QueryBus::new();
        let mut collector = QueryCollector::new(&bus);
        collector.start();
        collector.start();

        publish(&bus, "Album Load", "SELECT 1");
        assert_eq!(collector.count_of(QueryCategory::Load), 1);

        collector.stop();
        collector.stop();
        assert!(!collector.is_listening());
    }

    #[test]
    fn test_tracks_calls_by_operation_name() {
        let bus = QueryBus::new();
        let mut collector = QueryCollector::new(&bus);
        collector.start();

        publish(&bus, "Album Load", "SELECT 1");
        publish(&bus, "Album Load", "SELECT 1");
        publish(&bus, "Track Load", "SELECT 2");

        assert_eq!(collector.calls_named("Album Load"), 2);
        assert_eq!(collector.calls_named("Track Load"), 1);
        assert_eq!(collector.calls_named("Label Load"), 0);
    }

    #[test]
    fn test_count_of_is_idempotent() {
        let bus = QueryBus::new();
        let mut collector = QueryCollector::new(&bus);
        collector.start();
        publish(&bus, "Album Create", "INSERT INTO albums DEFAULT VALUES");

        assert_eq!(collector.count_of(QueryCategory::Insert), 1);
        assert_eq!(collector.count_of(QueryCategory::Insert), 1);
    }

    #[test]
    fn test_drop_releases_the_subscription() {
        let bus = QueryBus::new();
        {
            let mut collector = QueryCollector::new(&bus);
            collector.start();
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_overlapping_collectors_count_independently() {
        let bus = QueryBus::new();
        let mut outer = QueryCollector::new(&bus);
        outer.start();
        publish(&bus, "Album Load", "SELECT 1");

        let mut inner = QueryCollector::new(&bus);
        inner.start();
        publish(&bus, "Album Load", "SELECT 2");

        // The outer window includes everything the inner one saw.
        assert_eq!(outer.count_of(QueryCategory::Load), 2);
        assert_eq!(inner.count_of(QueryCategory::Load), 1);
    }
}
