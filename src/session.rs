//! One learning round: select, review, record, save
//!
//! Selecting words marks each of them as used. The learner then flags the
//! words they did not understand and checks in; only a checked-in round is
//! recorded and saved. Dropping or abandoning a round before that leaves the
//! tracking file untouched.

use std::collections::BTreeSet;

use rand::Rng;
use serde::Serialize;

use crate::tracking::{
    Clock, Recorder, Sampler, Selection, StatisticsStore, TrackingError, VocabularyPair, WordKey,
};

/// Counts shown to the learner after checking in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub to_repeat: usize,
    pub known: usize,
    pub difficult: Vec<WordKey>,
}

/// A review round over a statistics store
pub struct ReviewSession<'a> {
    store: &'a mut StatisticsStore,
    clock: &'a dyn Clock,
    selection: Selection,
    difficult: BTreeSet<WordKey>,
    checked_in: bool,
}

impl<'a> ReviewSession<'a> {
    /// Select the words for a new round and mark each as used
    pub fn begin<R: Rng + ?Sized>(
        store: &'a mut StatisticsStore,
        sampler: &Sampler,
        candidates: &[VocabularyPair],
        count: usize,
        clock: &'a dyn Clock,
        rng: &mut R,
    ) -> Self {
        let selection = sampler.select(store, candidates, count, clock.now(), rng);

        {
            let mut recorder = Recorder::new(&mut *store, clock);
            for pair in selection.selected() {
                recorder.mark_used(&pair.source, &pair.target);
            }
        }

        log::info!("Started review round with {} words", selection.selected_count);

        Self {
            store,
            clock,
            selection,
            difficult: BTreeSet::new(),
            checked_in: false,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn words(&self) -> impl Iterator<Item = &VocabularyPair> + '_ {
        self.selection.selected()
    }

    fn is_selected(&self, key: &WordKey) -> bool {
        self.selection.selected().any(|pair| &pair.key() == key)
    }

    /// Flip a selected word in or out of the "to repeat" set.
    ///
    /// Returns whether the word is now marked difficult. Words outside the
    /// selection, or any toggle after check-in, leave the set unchanged.
    pub fn toggle_difficult(&mut self, key: &WordKey) -> bool {
        if self.checked_in || !self.is_selected(key) {
            return self.difficult.contains(key);
        }
        if !self.difficult.remove(key) {
            self.difficult.insert(key.clone());
            return true;
        }
        false
    }

    pub fn is_difficult(&self, key: &WordKey) -> bool {
        self.difficult.contains(key)
    }

    /// Close feedback for this round; required before it can be saved
    pub fn check_in(&mut self) -> RoundSummary {
        self.checked_in = true;
        let total = self.selection.selected_count;
        RoundSummary {
            to_repeat: self.difficult.len(),
            known: total - self.difficult.len(),
            difficult: self.difficult.iter().cloned().collect(),
        }
    }

    pub fn is_checked_in(&self) -> bool {
        self.checked_in
    }

    /// Record the round's outcomes and save the store.
    ///
    /// Returns `Ok(false)` without touching the store if the round was never
    /// checked in. A save failure leaves the recorded outcomes in memory.
    pub fn finish(self) -> Result<bool, TrackingError> {
        if !self.checked_in {
            log::info!("Review round closed before check-in, nothing saved");
            return Ok(false);
        }

        {
            let mut recorder = Recorder::new(&mut *self.store, self.clock);
            for pair in self.selection.selected() {
                if self.difficult.contains(&pair.key()) {
                    recorder.mark_not_understood(&pair.source, &pair.target);
                } else {
                    recorder.mark_used(&pair.source, &pair.target);
                }
            }
        }

        self.store.save()?;
        log::info!(
            "Review round saved: {} to repeat, {} known",
            self.difficult.len(),
            self.selection.selected_count - self.difficult.len()
        );
        Ok(true)
    }

    /// Discard the round without saving
    pub fn abandon(self) {
        log::info!("Review round abandoned");
    }
}
