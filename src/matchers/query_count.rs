//! The general query-count matcher: any category, any comparison.

use crate::domain::{ExpectationError, ExpectationResult, QueryCategory};
use crate::matchers::{BlockExpectation, UNEVALUATED};
use crate::services::{
    Comparison, MatcherOutcome, MessageBuilder, PhraseFamily, QueryBus, QueryCollector,
};

/// A configured comparison plus its threshold and rendered wording.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QuantifiedComparison {
    pub kind: Comparison,
    pub wording: &'static str,
    pub threshold: u64,
}

/// Category configuration, either typed or named.
///
/// Named tokens come from the string-based `category` setter and are
/// resolved at evaluation time, so a typo fails the test with
/// [`ExpectationError::UnknownCategory`] before the block runs.
#[derive(Debug, Clone)]
enum CategoryToken {
    Resolved(QueryCategory),
    Named(String),
}

/// Counts queries of one category executed by a block and compares the
/// tally against a threshold.
///
/// Construction starts the collector immediately, so queries issued
/// between construction and evaluation are counted too. Setters may be
/// chained in any order and re-invoked; the last call wins. A matcher
/// is single-use: after one evaluation its collector is stopped.
///
/// ```
/// use querycount::{query_count_expectation, BlockExpectation, QueryBus, QueryEvent};
///
/// let bus = QueryBus::new();
/// let mut expectation = query_count_expectation(&bus).fewer_than(4).queries();
/// let verdict = expectation.matches(|| {
///     bus.publish(&QueryEvent::new("Album Load", "SELECT * FROM albums"));
/// });
/// assert_eq!(verdict, Ok(true));
/// ```
#[derive(Debug)]
pub struct QueryCountMatcher {
    collector: QueryCollector,
    comparison: Option<QuantifiedComparison>,
    category: Option<CategoryToken>,
    outcome: Option<MatcherOutcome>,
}

macro_rules! comparison_setter {
    ($(#[$doc:meta])* $name:ident, $kind:expr, $wording:expr) => {
        $(#[$doc])*
        #[must_use]
        pub fn $name(mut self, threshold: u64) -> Self {
            self.comparison = Some(QuantifiedComparison {
                kind: $kind,
                wording: $wording,
                threshold,
            });
            self
        }
    };
}

macro_rules! category_setter {
    ($(#[$doc:meta])* $name:ident, $category:expr) => {
        $(#[$doc])*
        #[must_use]
        pub fn $name(mut self) -> Self {
            self.category = Some(CategoryToken::Resolved($category));
            self
        }
    };
}

impl QueryCountMatcher {
    /// Create an unconfigured matcher listening on `bus`.
    pub fn new(bus: &QueryBus) -> Self {
        let mut collector = QueryCollector::new(bus);
        collector.start();
        Self {
            collector,
            comparison: None,
            category: None,
            outcome: None,
        }
    }

    // Quantifiers.

    comparison_setter!(
        /// Expect exactly `threshold` matching queries.
        exactly, Comparison::Exactly, ""
    );
    comparison_setter!(
        /// Expect fewer than `threshold` matching queries.
        less_than, Comparison::LessThan, "less than"
    );
    comparison_setter!(
        /// Alias for [`Self::less_than`]; renders as "fewer than".
        fewer_than, Comparison::LessThan, "fewer than"
    );
    comparison_setter!(
        /// Expect at most `threshold` matching queries.
        less_than_or_equal_to, Comparison::LessThanOrEqualTo, "at most"
    );
    comparison_setter!(
        /// Alias for [`Self::less_than_or_equal_to`].
        at_most, Comparison::LessThanOrEqualTo, "at most"
    );
    comparison_setter!(
        /// Expect more than `threshold` matching queries.
        greater_than, Comparison::GreaterThan, "more than"
    );
    comparison_setter!(
        /// Alias for [`Self::greater_than`].
        more_than, Comparison::GreaterThan, "more than"
    );
    comparison_setter!(
        /// Expect at least `threshold` matching queries.
        greater_than_or_equal_to, Comparison::GreaterThanOrEqualTo, "at least"
    );
    comparison_setter!(
        /// Alias for [`Self::greater_than_or_equal_to`].
        at_least, Comparison::GreaterThanOrEqualTo, "at least"
    );

    // Target categories, plural tokens and singular aliases.

    category_setter!(
        /// Count every data query.
        queries, QueryCategory::Queries
    );
    category_setter!(
        /// Singular alias for [`Self::queries`].
        query, QueryCategory::Queries
    );
    category_setter!(
        /// Count schema queries.
        schema_queries, QueryCategory::Schema
    );
    category_setter!(
        /// Singular alias for [`Self::schema_queries`].
        schema_query, QueryCategory::Schema
    );
    category_setter!(
        /// Count insert queries.
        insert_queries, QueryCategory::Insert
    );
    category_setter!(
        /// Singular alias for [`Self::insert_queries`].
        insert_query, QueryCategory::Insert
    );
    category_setter!(
        /// Count load queries.
        load_queries, QueryCategory::Load
    );
    category_setter!(
        /// Singular alias for [`Self::load_queries`].
        load_query, QueryCategory::Load
    );
    category_setter!(
        /// Count destroy queries, including bulk deletes.
        destroy_queries, QueryCategory::Destroy
    );
    category_setter!(
        /// Singular alias for [`Self::destroy_queries`].
        destroy_query, QueryCategory::Destroy
    );
    category_setter!(
        /// Count existence checks.
        exists_queries, QueryCategory::Exists
    );
    category_setter!(
        /// Singular alias for [`Self::exists_queries`].
        exists_query, QueryCategory::Exists
    );
    category_setter!(
        /// Count transaction begin statements.
        transaction_queries, QueryCategory::Transaction
    );
    category_setter!(
        /// Singular alias for [`Self::transaction_queries`].
        transaction_query, QueryCategory::Transaction
    );
    category_setter!(
        /// Count transaction commits.
        commit_queries, QueryCategory::Commit
    );
    category_setter!(
        /// Singular alias for [`Self::commit_queries`].
        commit_query, QueryCategory::Commit
    );
    category_setter!(
        /// Count transaction rollbacks.
        rollback_queries, QueryCategory::Rollback
    );
    category_setter!(
        /// Singular alias for [`Self::rollback_queries`].
        rollback_query, QueryCategory::Rollback
    );

    /// Configure the category by token name (`"load_queries"`,
    /// `"load_query"`, ...). Validation is deferred to evaluation so
    /// the chain stays fluent; an unknown token fails the evaluation
    /// before the block runs.
    #[must_use]
    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(CategoryToken::Named(name.into()));
        self
    }

    fn resolved_category(&self) -> ExpectationResult<QueryCategory> {
        match &self.category {
            None => Err(ExpectationError::MissingCategory),
            Some(CategoryToken::Resolved(category)) => Ok(*category),
            Some(CategoryToken::Named(name)) => QueryCategory::parse(name),
        }
    }
}

impl BlockExpectation for QueryCountMatcher {
    fn matches<F, R>(&mut self, block: F) -> ExpectationResult<bool>
    where
        F: FnOnce() -> R,
    {
        // Validate the whole configuration before the block runs; a
        // misconfigured expectation must not execute its side effects.
        let comparison = self
            .comparison
            .ok_or(ExpectationError::MissingComparison)?;
        let category = self.resolved_category()?;

        block();

        let observed = self.collector.count_of(category);
        self.collector.stop();

        self.outcome = Some(MatcherOutcome {
            family: PhraseFamily::QueryCount,
            category,
            comparison: comparison.kind,
            wording: comparison.wording,
            threshold: comparison.threshold,
            observed,
        });

        Ok(comparison.kind.evaluate(observed, comparison.threshold))
    }

    fn failure_message(&self) -> String {
        match &self.outcome {
            Some(outcome) => MessageBuilder::new(outcome).failure_message(),
            None => UNEVALUATED.to_string(),
        }
    }

    fn failure_message_when_negated(&self) -> String {
        match &self.outcome {
            Some(outcome) => MessageBuilder::new(outcome).failure_message_when_negated(),
            None => UNEVALUATED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QueryEvent;

    fn load(bus: &QueryBus) {
        bus.publish(&QueryEvent::new("Album Load", "SELECT * FROM albums"));
    }

    #[test]
    fn test_exact_match_verdicts() {
        let bus = QueryBus::new();
        let mut matcher = QueryCountMatcher::new(&bus).exactly(2).queries();
        let verdict = matcher.matches(|| {
            load(&bus);
            load(&bus);
        });
        assert_eq!(verdict, Ok(true));
    }

    #[test]
    fn test_setter_order_does_not_matter() {
        let bus = QueryBus::new();
        let mut matcher = QueryCountMatcher::new(&bus).queries().exactly(1);
        assert_eq!(matcher.matches(|| load(&bus)), Ok(true));
    }

    #[test]
    fn test_last_setter_wins() {
        let bus = QueryBus::new();
        let mut matcher = QueryCountMatcher::new(&bus)
            .exactly(5)
            .at_least(1)
            .load_queries()
            .queries();
        assert_eq!(matcher.matches(|| load(&bus)), Ok(true));
    }

    #[test]
    fn test_missing_comparison_errors_before_block_runs() {
        let bus = QueryBus::new();
        let mut matcher = QueryCountMatcher::new(&bus).queries();
        let mut ran = false;
        let verdict = matcher.matches(|| ran = true);
        assert_eq!(verdict, Err(ExpectationError::MissingComparison));
        assert!(!ran);
    }

    #[test]
    fn test_missing_category_errors_before_block_runs() {
        let bus = QueryBus::new();
        let mut matcher = QueryCountMatcher::new(&bus).less_than(3);
        let mut ran = false;
        let verdict = matcher.matches(|| ran = true);
        assert_eq!(verdict, Err(ExpectationError::MissingCategory));
        assert!(!ran);
    }

    #[test]
    fn test_unknown_named_category_errors_before_block_runs() {
        let bus = QueryBus::new();
        let mut matcher = QueryCountMatcher::new(&bus).exactly(1).category("laod_queries");
        let mut ran = false;
        let verdict = matcher.matches(|| ran = true);
        assert_eq!(
            verdict,
            Err(ExpectationError::UnknownCategory("laod_queries".to_string()))
        );
        assert!(!ran);
    }

    #[test]
    fn test_named_category_resolves_aliases() {
        let bus = QueryBus::new();
        let mut matcher = QueryCountMatcher::new(&bus).exactly(1).category("load_query");
        assert_eq!(matcher.matches(|| load(&bus)), Ok(true));
    }

    #[test]
    fn test_zero_boundary() {
        let bus = QueryBus::new();
        let mut matcher = QueryCountMatcher::new(&bus).exactly(0).queries();
        assert_eq!(matcher.matches(|| ()), Ok(true));

        let mut matcher = QueryCountMatcher::new(&bus).at_most(0).queries();
        assert_eq!(matcher.matches(|| ()), Ok(true));
    }

    #[test]
    fn test_counts_queries_issued_before_the_block() {
        let bus = QueryBus::new();
        let mut matcher = QueryCountMatcher::new(&bus).exactly(2).queries();
        // The collector listens from construction, by design.
        load(&bus);
        assert_eq!(matcher.matches(|| load(&bus)), Ok(true));
    }

    #[test]
    fn test_collector_stops_after_evaluation() {
        let bus = QueryBus::new();
        let mut matcher = QueryCountMatcher::new(&bus).exactly(0).queries();
        assert_eq!(bus.subscriber_count(), 1);
        let _ = matcher.matches(|| ());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_failure_message_uses_the_phrase_builder() {
        let bus = QueryBus::new();
        let mut matcher = QueryCountMatcher::new(&bus).more_than(3).insert_queries();
        assert_eq!(matcher.matches(|| ()), Ok(false));
        assert_eq!(
            matcher.failure_message(),
            "expected block to execute more than 3 insert queries, but it didn't execute any"
        );
    }

    #[test]
    fn test_messages_before_evaluation_are_placeholders() {
        let bus = QueryBus::new();
        let matcher = QueryCountMatcher::new(&bus).exactly(1).queries();
        assert_eq!(matcher.failure_message(), UNEVALUATED);
    }

    #[test]
    fn test_supports_block_expectations() {
        let bus = QueryBus::new();
        assert!(QueryCountMatcher::new(&bus).supports_block_expectations());
    }
}
