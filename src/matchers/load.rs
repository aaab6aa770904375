//! Repeated-load detection for one entity type (N+1 query smell).

use crate::domain::ExpectationResult;
use crate::matchers::BlockExpectation;
use crate::services::{QueryBus, QueryCollector};

/// Matches when a block loads one entity type more than once.
///
/// Bound to a single entity-type name at construction; the verdict is
/// simply `count > 1` on the collector's per-operation-name tally for
/// `"<EntityType> Load"`. The threshold is deliberately not
/// configurable: "repeatedly" means "more than once", full stop.
///
/// ```
/// use querycount::{repeated_load_expectation, BlockExpectation, QueryBus, QueryEvent};
///
/// let bus = QueryBus::new();
/// let mut expectation = repeated_load_expectation(&bus, "Album");
/// let verdict = expectation.matches(|| {
///     for id in [1, 2, 3] {
///         bus.publish(&QueryEvent::new(
///             "Album Load",
///             format!("SELECT * FROM albums WHERE id = {id}"),
///         ));
///     }
/// });
/// assert_eq!(verdict, Ok(true));
/// ```
#[derive(Debug)]
pub struct LoadMatcher {
    collector: QueryCollector,
    entity: String,
    observed: u64,
}

impl LoadMatcher {
    /// Create a matcher for `entity` listening on `bus`.
    pub fn new(bus: &QueryBus, entity: impl Into<String>) -> Self {
        let mut collector = QueryCollector::new(bus);
        collector.start();
        Self {
            collector,
            entity: entity.into(),
            observed: 0,
        }
    }
}

impl BlockExpectation for LoadMatcher {
    fn matches<F, R>(&mut self, block: F) -> ExpectationResult<bool>
    where
        F: FnOnce() -> R,
    {
        block();

        self.observed = self.collector.calls_named(&format!("{} Load", self.entity));
        self.collector.stop();

        Ok(self.observed > 1)
    }

    fn failure_message(&self) -> String {
        format!(
            "expected block to repeatedly load {}, but it was loaded {} times",
            self.entity, self.observed
        )
    }

    fn failure_message_when_negated(&self) -> String {
        format!(
            "expected block not to repeatedly load {}, but it was loaded {} times",
            self.entity, self.observed
        )
    }
}
