//! Querycount - test assertions about database query activity.
//!
//! Querycount hooks into a data-access layer's query-notification
//! stream, classifies each observed query into semantic categories, and
//! exposes fluent matcher objects that judge what a block of code
//! executed: "fewer than 4 queries", "repeatedly loads Album",
//! "commits a transaction".
//!
//! # Architecture
//!
//! - **Domain layer** (`domain`): the query event record, the category
//!   vocabulary, and the error taxonomy
//! - **Service layer** (`services`): the query bus, classifier,
//!   collector, comparison engine, and message builder
//! - **Matcher layer** (`matchers`): the fluent DSL objects
//!   implementing the block-expectation protocol
//!
//! # Example
//!
//! ```
//! use querycount::{query_count_expectation, BlockExpectation, QueryBus, QueryEvent};
//!
//! // One bus per test process; the instrumented data layer publishes
//! // an event for every executed statement.
//! let bus = QueryBus::new();
//!
//! let mut expectation = query_count_expectation(&bus).fewer_than(4).queries();
//! let verdict = expectation
//!     .matches(|| {
//!         bus.publish(&QueryEvent::new("Album Load", "SELECT * FROM albums"));
//!     })
//!     .expect("expectation fully configured");
//! assert!(verdict);
//! ```

pub mod domain;
pub mod matchers;
pub mod services;

pub use domain::{ExpectationError, ExpectationResult, QueryCategory, QueryEvent};
pub use matchers::{
    BlockExpectation, LoadMatcher, QueryCountMatcher, TransactionKind, TransactionMatcher,
};
pub use services::{Comparison, QueryBus, QueryClassifier, QueryCollector, SubscriptionId};

/// A fresh, unconfigured query-count matcher listening on `bus`.
///
/// Chain a quantifier and a category before evaluating:
/// `query_count_expectation(&bus).exactly(2).load_queries()`.
pub fn query_count_expectation(bus: &QueryBus) -> QueryCountMatcher {
    QueryCountMatcher::new(bus)
}

/// A matcher that passes when the block loads `entity` more than once.
pub fn repeated_load_expectation(bus: &QueryBus, entity: impl Into<String>) -> LoadMatcher {
    LoadMatcher::new(bus, entity)
}

/// A matcher that passes when the block begins a transaction.
pub fn transaction_expectation(bus: &QueryBus) -> TransactionMatcher {
    TransactionMatcher::new(bus, TransactionKind::Transaction)
}

/// A matcher that passes when the block rolls a transaction back.
pub fn rollback_expectation(bus: &QueryBus) -> TransactionMatcher {
    TransactionMatcher::new(bus, TransactionKind::Rollback)
}

/// A matcher that passes when the block commits a transaction.
pub fn commit_expectation(bus: &QueryBus) -> TransactionMatcher {
    TransactionMatcher::new(bus, TransactionKind::Commit)
}
