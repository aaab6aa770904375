//! The fluent matcher DSL exposed to test authors.
//!
//! Each matcher owns a [`crate::services::QueryCollector`] that starts
//! listening the moment the matcher is constructed, and implements the
//! conventional block-expectation contract: report support for block
//! expectations, evaluate a block to a verdict, and render failure
//! prose for either polarity.

pub mod load;
pub mod query_count;
pub mod transaction;

pub use load::LoadMatcher;
pub use query_count::QueryCountMatcher;
pub use transaction::{TransactionKind, TransactionMatcher};

use crate::domain::ExpectationResult;

/// Placeholder text for failure messages requested before evaluation.
pub(crate) const UNEVALUATED: &str = "expectation has not been evaluated yet";

/// The three-method contract a block-style assertion framework expects.
///
/// `matches` runs the block exactly once and returns `Ok(verdict)`;
/// configuration errors (incomplete DSL chains, unknown category
/// tokens) are returned as `Err` before the block is invoked and must
/// abort the test rather than read as a failed expectation.
pub trait BlockExpectation {
    /// Matchers in this crate always evaluate blocks.
    fn supports_block_expectations(&self) -> bool {
        true
    }

    /// Run the block and judge the accumulated counts.
    fn matches<F, R>(&mut self, block: F) -> ExpectationResult<bool>
    where
        F: FnOnce() -> R;

    /// Prose for a failed positive expectation.
    fn failure_message(&self) -> String;

    /// Prose for a failed negated expectation.
    fn failure_message_when_negated(&self) -> String;
}
