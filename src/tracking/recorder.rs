//! Appends review outcomes to the statistics store

use super::clock::Clock;
use super::models::{Occurrence, WordKey};
use super::storage::StatisticsStore;

/// Writes review events into a [`StatisticsStore`]
///
/// Every call appends a new occurrence; history is a log, so repeated calls
/// for the same word add repeated events.
pub struct Recorder<'a> {
    store: &'a mut StatisticsStore,
    clock: &'a dyn Clock,
}

impl<'a> Recorder<'a> {
    pub fn new(store: &'a mut StatisticsStore, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Record that the word was used and understood
    pub fn mark_used(&mut self, word: &str, translation: &str) {
        self.record(&WordKey::new(word, translation), false);
    }

    /// Record that the word was not understood and should come back soon
    pub fn mark_not_understood(&mut self, word: &str, translation: &str) {
        self.record(&WordKey::new(word, translation), true);
    }

    /// Append one occurrence for `key`, creating its record if needed
    pub fn record(&mut self, key: &WordKey, repeat: bool) {
        let occurrence = Occurrence::new(self.clock.now(), repeat);
        let record = self.store.record_mut(key);
        record.occurrences.push(occurrence);
        log::debug!(
            "Recorded {} for {} ({} events)",
            if repeat { "miss" } else { "use" },
            key,
            record.occurrences.len()
        );
    }
}
