pub mod config;
pub mod session;
pub mod tracking;
pub mod vocabulary;

pub use config::LexisConfig;
pub use session::{ReviewSession, RoundSummary};
pub use tracking::{StatisticsStore, VocabularyPair, WordKey};
