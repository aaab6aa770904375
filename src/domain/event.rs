//! The query event record consumed from the data-access layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed data-access operation.
///
/// `name` is the human-readable operation label the data layer attaches
/// to the statement (e.g. `"Album Load"`, `"SCHEMA"`, `"TRANSACTION"`);
/// `sql` is the literal statement text. Events are classified once and
/// not retained afterwards except as aggregate counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEvent {
    /// Operation label assigned by the data layer.
    pub name: String,
    /// Literal statement text.
    pub sql: String,
    /// When the event was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl QueryEvent {
    /// Create an event stamped with the current time.
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
            recorded_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for QueryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.sql)
    }
}
