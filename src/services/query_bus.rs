//! In-process broadcast channel for query events.
//!
//! The data-access layer publishes one [`QueryEvent`] per executed
//! statement; any number of subscribers receive every event published
//! while their subscription is live. Fan-out happens synchronously on
//! the publisher's thread, so a subscriber sees events in the order the
//! instrumented code issued them.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::QueryEvent;

/// Handle identifying one live subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Mint a fresh handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Subscriber = Arc<dyn Fn(&QueryEvent) + Send + Sync>;

/// Synchronous broadcast point for query events.
///
/// Cloning a `QueryBus` clones a handle to the same channel; collectors
/// and the instrumented data layer share one bus per test process. The
/// bus is injected everywhere it is needed rather than reached for as a
/// process global.
#[derive(Clone, Default)]
pub struct QueryBus {
    subscribers: Arc<RwLock<HashMap<SubscriptionId, Subscriber>>>,
}

impl QueryBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for every subsequently published event.
    pub fn subscribe(&self, callback: impl Fn(&QueryEvent) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId::new();
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        subscribers.insert(id, Arc::new(callback));
        tracing::debug!(subscription = %id, "query bus subscription added");
        id
    }

    /// Remove a subscription. Idempotent: unsubscribing a handle twice,
    /// or a handle that was never issued, is a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = {
            let mut subscribers = self
                .subscribers
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            subscribers.remove(&id).is_some()
        };
        if removed {
            tracing::debug!(subscription = %id, "query bus subscription removed");
        }
        removed
    }

    /// Broadcast an event to every live subscriber.
    ///
    /// The subscriber list is snapshotted before callbacks run, so a
    /// callback may itself subscribe or unsubscribe without deadlock;
    /// such changes take effect from the next publish.
    pub fn publish(&self, event: &QueryEvent) {
        let snapshot: Vec<Subscriber> = {
            let subscribers = self
                .subscribers
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            subscribers.values().cloned().collect()
        };
        tracing::trace!(name = %event.name, subscribers = snapshot.len(), "publishing query event");
        for subscriber in snapshot {
            subscriber(event);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for QueryBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
