//! Domain layer for the querycount expectation toolkit.
//!
//! Pure types with no subscription or counting machinery: the query
//! event record, the category vocabulary, and the error taxonomy.

pub mod category;
pub mod errors;
pub mod event;

pub use category::QueryCategory;
pub use errors::{ExpectationError, ExpectationResult};
pub use event::QueryEvent;
