//! Matchers for transaction-control activity.

use crate::domain::{ExpectationResult, QueryCategory};
use crate::matchers::query_count::QuantifiedComparison;
use crate::matchers::{BlockExpectation, UNEVALUATED};
use crate::services::{
    Comparison, MatcherOutcome, MessageBuilder, PhraseFamily, QueryBus, QueryCollector,
};

/// Which kind of transaction-control activity a matcher watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Transaction begin statements.
    Transaction,
    /// Commits.
    Commit,
    /// Rollbacks.
    Rollback,
}

impl TransactionKind {
    fn category(self) -> QueryCategory {
        match self {
            Self::Transaction => QueryCategory::Transaction,
            Self::Commit => QueryCategory::Commit,
            Self::Rollback => QueryCategory::Rollback,
        }
    }
}

/// Counts one kind of transaction-control event executed by a block.
///
/// Bound to its kind at construction and evaluable without further
/// configuration: the default comparison is `at_least(1)`, so a bare
/// matcher expresses "this happened at all". Quantifier setters and
/// the `once`/`twice`/`thrice` sugar refine that.
///
/// ```
/// use querycount::{commit_expectation, BlockExpectation, QueryBus, QueryEvent};
///
/// let bus = QueryBus::new();
/// let mut expectation = commit_expectation(&bus);
/// let verdict = expectation.matches(|| {
///     bus.publish(&QueryEvent::new("TRANSACTION", "COMMIT"));
/// });
/// assert_eq!(verdict, Ok(true));
/// ```
#[derive(Debug)]
pub struct TransactionMatcher {
    collector: QueryCollector,
    kind: TransactionKind,
    comparison: QuantifiedComparison,
    outcome: Option<MatcherOutcome>,
}

macro_rules! comparison_setter {
    ($(#[$doc:meta])* $name:ident, $kind:expr, $wording:expr) => {
        $(#[$doc])*
        #[must_use]
        pub fn $name(mut self, threshold: u64) -> Self {
            self.comparison = QuantifiedComparison {
                kind: $kind,
                wording: $wording,
                threshold,
            };
            self
        }
    };
}

impl TransactionMatcher {
    /// Create a matcher for `kind` listening on `bus`, defaulting to
    /// `at_least(1)`.
    pub fn new(bus: &QueryBus, kind: TransactionKind) -> Self {
        let mut collector = QueryCollector::new(bus);
        collector.start();
        Self {
            collector,
            kind,
            comparison: QuantifiedComparison {
                kind: Comparison::GreaterThanOrEqualTo,
                wording: "at least",
                threshold: 1,
            },
            outcome: None,
        }
    }

    // Quantifiers.

    comparison_setter!(
        /// Expect exactly `threshold` occurrences.
        exactly, Comparison::Exactly, ""
    );
    comparison_setter!(
        /// Expect fewer than `threshold` occurrences.
        less_than, Comparison::LessThan, "less than"
    );
    comparison_setter!(
        /// Alias for [`Self::less_than`]; renders as "fewer than".
        fewer_than, Comparison::LessThan, "fewer than"
    );
    comparison_setter!(
        /// Expect at most `threshold` occurrences.
        less_than_or_equal_to, Comparison::LessThanOrEqualTo, "at most"
    );
    comparison_setter!(
        /// Alias for [`Self::less_than_or_equal_to`].
        at_most, Comparison::LessThanOrEqualTo, "at most"
    );
    comparison_setter!(
        /// Expect more than `threshold` occurrences.
        greater_than, Comparison::GreaterThan, "more than"
    );
    comparison_setter!(
        /// Alias for [`Self::greater_than`].
        more_than, Comparison::GreaterThan, "more than"
    );
    comparison_setter!(
        /// Expect at least `threshold` occurrences.
        greater_than_or_equal_to, Comparison::GreaterThanOrEqualTo, "at least"
    );
    comparison_setter!(
        /// Alias for [`Self::greater_than_or_equal_to`].
        at_least, Comparison::GreaterThanOrEqualTo, "at least"
    );

    /// Sugar for `exactly(1)`.
    #[must_use]
    pub fn once(self) -> Self {
        self.exactly(1).time()
    }

    /// Sugar for `exactly(2)`.
    #[must_use]
    pub fn twice(self) -> Self {
        self.exactly(2).times()
    }

    /// Sugar for `exactly(3)`.
    #[must_use]
    pub fn thrice(self) -> Self {
        self.exactly(3).times()
    }

    /// Readability tail; changes nothing.
    #[must_use]
    pub fn times(self) -> Self {
        self
    }

    /// Alias for [`Self::times`].
    #[must_use]
    pub fn time(self) -> Self {
        self
    }
}

impl BlockExpectation for TransactionMatcher {
    fn matches<F, R>(&mut self, block: F) -> ExpectationResult<bool>
    where
        F: FnOnce() -> R,
    {
        block();

        let category = self.kind.category();
        let observed = self.collector.count_of(category);
        self.collector.stop();

        self.outcome = Some(MatcherOutcome {
            family: PhraseFamily::Transaction,
            category,
            comparison: self.comparison.kind,
            wording: self.comparison.wording,
            threshold: self.comparison.threshold,
            observed,
        });

        Ok(self
            .comparison
            .kind
            .evaluate(observed, self.comparison.threshold))
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
