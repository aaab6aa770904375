//! Errors surfaced by the expectation DSL.
//!
//! All variants are configuration errors: they mean the DSL was used
//! incompletely or with a typo, and they abort the test instead of
//! reporting a misleading pass/fail verdict. A failed expectation is
//! never an error; it is the `Ok(false)` verdict plus a rendered
//! failure message.

use thiserror::Error;

/// Configuration errors raised when evaluating a matcher.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpectationError {
    #[error(
        "no comparison configured; provide an entire expectation, \
         e.g. query_count_expectation(&bus).less_than(n).queries()"
    )]
    MissingComparison,

    #[error(
        "no query category configured; provide an entire expectation, \
         e.g. query_count_expectation(&bus).less_than(n).queries()"
    )]
    MissingCategory,

    #[error("unknown query category: {0:?}")]
    UnknownCategory(String),
}

/// Result alias for matcher evaluation.
pub type ExpectationResult<T> = Result<T, ExpectationError>;
