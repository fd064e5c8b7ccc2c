//! Review priority scoring
//!
//! Scores how urgently a word should reappear in the next session.
//! Higher is more urgent.
//!
//! ```text
//! base     = min(days_since_last_use * 5, 50)
//! bonus    = times_not_understood * 20
//! penalty  = min(times_used * 2, 30)
//! priority = max(base + bonus - penalty, 1)
//! ```
//!
//! Words without any history score [`NEW_WORD_PRIORITY`].

use chrono::NaiveDateTime;
use serde::Serialize;

use super::models::WordRecord;

/// Priority of a word that has never been tracked
pub const NEW_WORD_PRIORITY: u32 = 100;

/// Age used when the last use is missing or unreadable
pub const UNKNOWN_AGE_DAYS: i64 = 999;

const POINTS_PER_DAY: i64 = 5;
const MAX_AGE_POINTS: i64 = 50;
const POINTS_PER_MISUNDERSTANDING: i64 = 20;
const PENALTY_PER_USE: i64 = 2;
const MAX_FREQUENCY_PENALTY: i64 = 30;
const MIN_PRIORITY: i64 = 1;

/// The individual terms behind a priority score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityBreakdown {
    /// `None` for a word with no record
    pub days_since_last_use: Option<i64>,
    pub base: i64,
    pub misunderstanding_bonus: i64,
    pub frequency_penalty: i64,
    pub priority: u32,
}

impl PriorityBreakdown {
    fn new_word() -> Self {
        Self {
            days_since_last_use: None,
            base: 0,
            misunderstanding_bonus: 0,
            frequency_penalty: 0,
            priority: NEW_WORD_PRIORITY,
        }
    }
}

/// Whole days between the record's last occurrence and `now`.
///
/// Empty histories and unreadable timestamps count as [`UNKNOWN_AGE_DAYS`].
/// Timestamps in the future count as zero days.
pub fn days_since_last_use(record: &WordRecord, now: NaiveDateTime) -> i64 {
    match record.last_seen() {
        Some(last) => (now - last).num_days().max(0),
        None => UNKNOWN_AGE_DAYS,
    }
}

/// Score a word's history, `None` meaning the word has never been tracked
pub fn calculate_priority(record: Option<&WordRecord>, now: NaiveDateTime) -> u32 {
    priority_breakdown(record, now).priority
}

/// Score a word's history and keep every term of the calculation
pub fn priority_breakdown(record: Option<&WordRecord>, now: NaiveDateTime) -> PriorityBreakdown {
    let Some(record) = record else {
        return PriorityBreakdown::new_word();
    };

    let days = days_since_last_use(record, now);
    let times_used = record.times_used() as i64;
    let times_not_understood = record.times_not_understood() as i64;

    let base = days.saturating_mul(POINTS_PER_DAY).min(MAX_AGE_POINTS);
    let misunderstanding_bonus = times_not_understood.saturating_mul(POINTS_PER_MISUNDERSTANDING);
    let frequency_penalty = times_used
        .saturating_mul(PENALTY_PER_USE)
        .min(MAX_FREQUENCY_PENALTY);

    let score = (base + misunderstanding_bonus - frequency_penalty).max(MIN_PRIORITY);

    PriorityBreakdown {
        days_since_last_use: Some(days),
        base,
        misunderstanding_bonus,
        frequency_penalty,
        priority: u32::try_from(score).unwrap_or(u32::MAX),
    }
}

/// Format a day count for display
pub fn format_age(days: Option<i64>) -> String {
    match days {
        None => "new".to_string(),
        Some(d) if d >= UNKNOWN_AGE_DAYS => "never".to_string(),
        Some(0) => "today".to_string(),
        Some(d) if d < 7 => format!("{}d", d),
        Some(d) if d < 30 => format!("{}w", d / 7),
        Some(d) if d < 365 => format!("{}mo", d / 30),
        Some(d) => format!("{}y", d / 365),
    }
}
