//! Numeric predicates a matcher evaluates against an observed count.

use serde::{Deserialize, Serialize};

/// One of the five comparison kinds a matcher can be configured with.
///
/// Both operands are non-negative integers; there is no rounding and
/// no floating point anywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Exactly,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
}

impl Comparison {
    /// Apply the predicate.
    pub fn evaluate(self, observed: u64, threshold: u64) -> bool {
        match self {
            Self::Exactly => observed == threshold,
            Self::LessThan => observed < threshold,
            Self::LessThanOrEqualTo => observed <= threshold,
            Self::GreaterThan => observed > threshold,
            Self::GreaterThanOrEqualTo => observed >= threshold,
        }
    }

    /// Default prose wording for the comparison, as used in failure
    /// messages. `Exactly` has no wording: the quantity stands alone.
    pub fn wording(self) -> &'static str {
        match self {
            Self::Exactly => "",
            Self::LessThan => "less than",
            Self::LessThanOrEqualTo => "at most",
            Self::GreaterThan => "more than",
            Self::GreaterThanOrEqualTo => "at least",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly() {
        assert!(Comparison::Exactly.evaluate(2, 2));
        assert!(!Comparison::Exactly.evaluate(3, 2));
        assert!(Comparison::Exactly.evaluate(0, 0));
    }

    #[test]
    fn test_less_than() {
        assert!(Comparison::LessThan.evaluate(1, 2));
        assert!(!Comparison::LessThan.evaluate(2, 2));
    }

    #[test]
    fn test_less_than_or_equal_to() {
        assert!(Comparison::LessThanOrEqualTo.evaluate(2, 2));
        assert!(Comparison::LessThanOrEqualTo.evaluate(0, 0));
        assert!(!Comparison::LessThanOrEqualTo.evaluate(3, 2));
    }

    #[test]
    fn test_greater_than() {
        assert!(Comparison::GreaterThan.evaluate(3, 2));
        assert!(!Comparison::GreaterThan.evaluate(2, 2));
    }

    #[test]
    fn test_greater_than_or_equal_to() {
        assert!(Comparison::GreaterThanOrEqualTo.evaluate(2, 2));
        assert!(!Comparison::GreaterThanOrEqualTo.evaluate(1, 2));
    }
}
