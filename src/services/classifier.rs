//! Classification of raw query events into semantic categories.

use crate::domain::{QueryCategory, QueryEvent};

/// True when `text` begins with `prefix`, ignoring ASCII case.
fn starts_with_ignore_ascii_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Maps one query event to the set of categories it belongs to.
///
/// Pure and total: classification never fails and never returns an
/// empty set. Operation names carry a fixed vocabulary of suffixes
/// assigned by the data layer; SQL-text sniffing is reserved for
/// transaction control statements, which lack a reliable name in all
/// code paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryClassifier;

impl QueryClassifier {
    /// Categorize an event.
    ///
    /// Evaluated as an ordered first-match decision list; order matters
    /// because the predicates overlap. Data queries always include the
    /// [`QueryCategory::Queries`] catch-all alongside their specific
    /// bucket; schema and transaction-control events do not.
    pub fn categorize(event: &QueryEvent) -> Vec<QueryCategory> {
        if event.name == "SCHEMA" {
            vec![QueryCategory::Schema]
        } else if starts_with_ignore_ascii_case(&event.sql, "commit") {
            vec![QueryCategory::Commit]
        } else if starts_with_ignore_ascii_case(&event.sql, "rollback") {
            vec![QueryCategory::Rollback]
        } else if event.name == "TRANSACTION" {
            vec![QueryCategory::Transaction]
        } else if event.name.ends_with("Create") {
            vec![QueryCategory::Queries, QueryCategory::Insert]
        } else if event.name.ends_with("Load") {
            vec![QueryCategory::Queries, QueryCategory::Load]
        } else if event.name.ends_with("Destroy") || event.name.ends_with("Delete All") {
            vec![QueryCategory::Queries, QueryCategory::Destroy]
        } else if event.name.ends_with("Exists") || event.name.ends_with("Exists?") {
            vec![QueryCategory::Queries, QueryCategory::Exists]
        } else {
            vec![QueryCategory::Queries]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories_for(name: &str, sql: &str) -> Vec<QueryCategory> {
        QueryClassifier::categorize(&QueryEvent::new(name, sql))
    }

    #[test]
    fn test_schema_events_are_exclusive() {
        assert_eq!(
            categories_for("SCHEMA", "CREATE TABLE albums (id INTEGER)"),
            vec![QueryCategory::Schema]
        );
    }

    #[test]
    fn test_commit_and_rollback_sniff_sql_case_insensitively() {
        assert_eq!(categories_for("TRANSACTION", "COMMIT"), vec![QueryCategory::Commit]);
        assert_eq!(categories_for("TRANSACTION", "commit"), vec![QueryCategory::Commit]);
        assert_eq!(
            categories_for("TRANSACTION", "ROLLBACK TO SAVEPOINT s1"),
            vec![QueryCategory::Rollback]
        );
    }

    #[test]
    fn test_transaction_name_after_sql_sniff() {
        assert_eq!(
            categories_for("TRANSACTION", "begin transaction"),
            vec![QueryCategory::Transaction]
        );
    }

    #[test]
    fn test_create_suffix_is_an_insert() {
        assert_eq!(
            categories_for("Album Create", "INSERT INTO albums DEFAULT VALUES"),
            vec![QueryCategory::Queries, QueryCategory::Insert]
        );
    }

    #[test]
    fn test_load_suffix_is_a_load() {
        assert_eq!(
            categories_for("Album Load", "SELECT * FROM albums"),
            vec![QueryCategory::Queries, QueryCategory::Load]
        );
    }

    #[test]
    fn test_destroy_and_delete_all_share_a_bucket() {
        assert_eq!(
            categories_for("Album Destroy", "DELETE FROM albums WHERE id = 1"),
            vec![QueryCategory::Queries, QueryCategory::Destroy]
        );
        assert_eq!(
            categories_for("Album Delete All", "DELETE FROM albums"),
            vec![QueryCategory::Queries, QueryCategory::Destroy]
        );
    }

    #[test]
    fn test_exists_with_and_without_question_mark() {
        assert_eq!(
            categories_for("Album Exists", "SELECT 1 FROM albums LIMIT 1"),
            vec![QueryCategory::Queries, QueryCategory::Exists]
        );
        assert_eq!(
            categories_for("Album Exists?", "SELECT 1 FROM albums LIMIT 1"),
            vec![QueryCategory::Queries, QueryCategory::Exists]
        );
    }

    #[test]
    fn test_unrecognized_names_fall_back_to_the_catch_all() {
        assert_eq!(
            categories_for("Raw SQL", "SELECT count(*) FROM albums"),
            vec![QueryCategory::Queries]
        );
        assert_eq!(categories_for("", ""), vec![QueryCategory::Queries]);
    }
}
