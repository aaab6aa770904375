//! Service layer: the bus, the classification and counting pipeline,
//! and the comparison/message engines the matchers compose.

pub mod classifier;
pub mod collector;
pub mod comparison;
pub mod message_builder;
pub mod query_bus;

pub use classifier::QueryClassifier;
pub use collector::QueryCollector;
pub use comparison::Comparison;
pub use message_builder::{MatcherOutcome, MessageBuilder, PhraseFamily};
pub use query_bus::{QueryBus, SubscriptionId};
