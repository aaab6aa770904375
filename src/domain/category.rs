//! Semantic buckets a query event can be classified into.

use serde::{Deserialize, Serialize};

use super::errors::ExpectationError;

/// A semantic bucket for observed queries.
///
/// `Queries` is the catch-all: every data query lands there in addition
/// to its specific bucket. Schema and transaction-control events are
/// exclusive of the catch-all and of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryCategory {
    Queries,
    Schema,
    Insert,
    Load,
    Destroy,
    Exists,
    Transaction,
    Commit,
    Rollback,
}

impl QueryCategory {
    /// Every category, in a fixed order. Collectors initialize one
    /// counter per entry.
    pub const ALL: [QueryCategory; 9] = [
        QueryCategory::Queries,
        QueryCategory::Schema,
        QueryCategory::Insert,
        QueryCategory::Load,
        QueryCategory::Destroy,
        QueryCategory::Exists,
        QueryCategory::Transaction,
        QueryCategory::Commit,
        QueryCategory::Rollback,
    ];

    /// The DSL token naming this category (plural form).
    pub fn token(self) -> &'static str {
        match self {
            Self::Queries => "queries",
            Self::Schema => "schema_queries",
            Self::Insert => "insert_queries",
            Self::Load => "load_queries",
            Self::Destroy => "destroy_queries",
            Self::Exists => "exists_queries",
            Self::Transaction => "transaction_queries",
            Self::Commit => "commit_queries",
            Self::Rollback => "rollback_queries",
        }
    }

    /// Human label with underscores replaced by spaces, plural form.
    pub fn label_plural(self) -> &'static str {
        match self {
            Self::Queries => "queries",
            Self::Schema => "schema queries",
            Self::Insert => "insert queries",
            Self::Load => "load queries",
            Self::Destroy => "destroy queries",
            Self::Exists => "exists queries",
            Self::Transaction => "transaction queries",
            Self::Commit => "commit queries",
            Self::Rollback => "rollback queries",
        }
    }

    /// Human label, singular form.
    pub fn label_singular(self) -> &'static str {
        match self {
            Self::Queries => "query",
            Self::Schema => "schema query",
            Self::Insert => "insert query",
            Self::Load => "load query",
            Self::Destroy => "destroy query",
            Self::Exists => "exists query",
            Self::Transaction => "transaction query",
            Self::Commit => "commit query",
            Self::Rollback => "rollback query",
        }
    }

    /// Resolve a DSL token, accepting both the plural token and its
    /// singularized alias (`schema_queries` / `schema_query`).
    ///
    /// Fails with [`ExpectationError::UnknownCategory`] for anything
    /// outside the fixed vocabulary; a typo in test code must abort the
    /// test rather than silently count nothing.
    pub fn parse(token: &str) -> Result<Self, ExpectationError> {
        match token {
            "queries" | "query" => Ok(Self::Queries),
            "schema_queries" | "schema_query" => Ok(Self::Schema),
            "insert_queries" | "insert_query" => Ok(Self::Insert),
            "load_queries" | "load_query" => Ok(Self::Load),
            "destroy_queries" | "destroy_query" => Ok(Self::Destroy),
            "exists_queries" | "exists_query" => Ok(Self::Exists),
            "transaction_queries" | "transaction_query" => Ok(Self::Transaction),
            "commit_queries" | "commit_query" => Ok(Self::Commit),
            "rollback_queries" | "rollback_query" => Ok(Self::Rollback),
            other => Err(ExpectationError::UnknownCategory(other.to_string())),
        }
    }
}

impl std::fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}
