//! Spaced repetition tracking for vocabulary
//!
//! This module provides:
//! - Per-word usage history persisted to a JSON file
//! - Priority scoring from age, misunderstandings and familiarity
//! - Random batch sampling and ranking for a session
//! - Recording of session outcomes

pub mod clock;
pub mod models;
pub mod priority;
pub mod recorder;
pub mod sampler;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use models::*;
pub use recorder::Recorder;
pub use sampler::{Sampler, ScoredPair, Selection, UrgencyBar};
pub use storage::{LoadReport, LoadStatus, StatisticsStore, TrackingError};
