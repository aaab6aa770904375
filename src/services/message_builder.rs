//! Failure-message rendering for evaluated matchers.
//!
//! Produces the two prose strings the block-expectation protocol wants:
//! a failure message and a negated failure message. Grammar is fussy on
//! purpose: category nouns singularize when the threshold is 1, the
//! observed count reads "one" rather than "1", and negating an exact
//! match collapses to "did so" because "didn't execute any" inside a
//! negation is a confusing double negative.

use crate::domain::QueryCategory;
use crate::services::comparison::Comparison;

/// Which phrase family a matcher renders with.
///
/// A query-count matcher always conjugates "execute" and names the
/// category ("2 insert queries"); a transaction matcher picks its verb
/// from the transaction sub-kind and names plain "transactions".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseFamily {
    QueryCount,
    Transaction,
}

/// Snapshot of a matcher's resolved state after evaluation.
#[derive(Debug, Clone)]
pub struct MatcherOutcome {
    /// Phrase family of the matcher that produced this outcome.
    pub family: PhraseFamily,
    /// The configured category.
    pub category: QueryCategory,
    /// The configured comparison kind.
    pub comparison: Comparison,
    /// Comparison wording, echoing the alias the test author used
    /// (`fewer_than` renders "fewer than", `less_than` "less than").
    pub wording: &'static str,
    /// The configured threshold.
    pub threshold: u64,
    /// The count the collector observed.
    pub observed: u64,
}

struct VerbSet {
    infinitive: &'static str,
    none: &'static str,
    one: &'static str,
    many: &'static str,
}

const EXECUTE: VerbSet = VerbSet {
    infinitive: "execute",
    none: "didn't execute any",
    one: "executed one",
    many: "executed",
};

const COMMIT: VerbSet = VerbSet {
    infinitive: "commit",
    none: "didn't commit any",
    one: "committed one",
    many: "committed",
};

const ROLL_BACK: VerbSet = VerbSet {
    infinitive: "roll back",
    none: "didn't roll back any",
    one: "rolled one back",
    many: "rolled back",
};

/// Renders pass/fail prose from a [`MatcherOutcome`].
#[derive(Debug)]
pub struct MessageBuilder<'a> {
    outcome: &'a MatcherOutcome,
}

impl<'a> MessageBuilder<'a> {
    /// Wrap an outcome for rendering.
    pub fn new(outcome: &'a MatcherOutcome) -> Self {
        Self { outcome }
    }

    /// The positive failure message.
    pub fn failure_message(&self) -> String {
        format!(
            "expected block to {}, but it {}",
            self.prefix(),
            self.suffix()
        )
    }

    /// The failure message when the expectation was negated.
    pub fn failure_message_when_negated(&self) -> String {
        format!(
            "expected block not to {}, but it {}",
            self.prefix(),
            self.negated_suffix()
        )
    }

    fn verbs(&self) -> &'static VerbSet {
        match self.outcome.family {
            PhraseFamily::QueryCount => &EXECUTE,
            PhraseFamily::Transaction => match self.outcome.category {
                QueryCategory::Commit => &COMMIT,
                QueryCategory::Rollback => &ROLL_BACK,
                _ => &EXECUTE,
            },
        }
    }

    fn prefix(&self) -> String {
        format!(
            "{} {} {}",
            self.verbs().infinitive,
            self.comparison_phrase(),
            self.noun()
        )
    }

    fn comparison_phrase(&self) -> String {
        let quantity = if self.outcome.threshold == 1 {
            if self.outcome.comparison == Comparison::Exactly {
                "a".to_string()
            } else {
                "one".to_string()
            }
        } else {
            self.outcome.threshold.to_string()
        };

        if self.outcome.comparison == Comparison::Exactly {
            quantity
        } else {
            format!("{} {}", self.outcome.wording, quantity)
        }
    }

    fn noun(&self) -> &'static str {
        let singular = self.outcome.threshold == 1;
        match self.outcome.family {
            PhraseFamily::QueryCount => {
                if singular {
                    self.outcome.category.label_singular()
                } else {
                    self.outcome.category.label_plural()
                }
            }
            PhraseFamily::Transaction => {
                if singular {
                    "transaction"
                } else {
                    "transactions"
                }
            }
        }
    }

    fn suffix(&self) -> String {
        let verbs = self.verbs();
        match self.outcome.observed {
            0 => verbs.none.to_string(),
            1 => verbs.one.to_string(),
            n => format!("{} {n}", verbs.many),
        }
    }

    fn negated_suffix(&self) -> String {
        if self.outcome.comparison == Comparison::Exactly {
            return "did so".to_string();
        }
        let verbs = self.verbs();
        match self.outcome.observed {
            // Not "didn't execute any": inside a negated expectation
            // that would read as a double negative.
            1 => verbs.one.to_string(),
            n => format!("{} {n}", verbs.many),
        }
    }
}
