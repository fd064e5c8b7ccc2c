//! Session word selection
//!
//! A session draws a random batch from the candidate pool, scores every
//! word in it and keeps the most urgent ones. Sampling first bounds the
//! scoring cost and varies sessions even for large vocabularies.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::Serialize;

use super::models::VocabularyPair;
use super::priority::calculate_priority;
use super::storage::StatisticsStore;

pub const DEFAULT_SAMPLE_SIZE: usize = 40;
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// A sampled word with its score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredPair {
    pub pair: VocabularyPair,
    pub priority: u32,
}

/// One line of the urgency report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyBar {
    /// Length relative to the most urgent word in the batch
    pub length: usize,
    /// Whether the word made it into the selection
    pub selected: bool,
}

/// Outcome of a selection: the full ranked batch and how many were kept
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    /// Every sampled word, most urgent first
    pub ranked: Vec<ScoredPair>,
    /// Number of leading entries in `ranked` that were selected
    pub selected_count: usize,
    pub bars: Vec<UrgencyBar>,
}

impl Selection {
    fn empty() -> Self {
        Self {
            ranked: Vec::new(),
            selected_count: 0,
            bars: Vec::new(),
        }
    }

    /// The chosen words, most urgent first
    pub fn selected(&self) -> impl Iterator<Item = &VocabularyPair> + '_ {
        self.ranked[..self.selected_count].iter().map(|s| &s.pair)
    }

    pub fn into_selected(self) -> Vec<VocabularyPair> {
        self.ranked
            .into_iter()
            .take(self.selected_count)
            .map(|s| s.pair)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_count == 0
    }
}

/// Picks the words for a session
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    sample_size: usize,
    bar_width: usize,
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

impl Sampler {
    /// Both settings are capped at their defaults
    pub fn new(sample_size: usize, bar_width: usize) -> Self {
        Self {
            sample_size: sample_size.min(DEFAULT_SAMPLE_SIZE),
            bar_width: bar_width.min(DEFAULT_BAR_WIDTH),
        }
    }

    /// Select up to `count` of the most urgent words from a random batch of
    /// `candidates`.
    ///
    /// Ties keep the order in which the batch was drawn.
    pub fn select<R: Rng + ?Sized>(
        &self,
        store: &StatisticsStore,
        candidates: &[VocabularyPair],
        count: usize,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Selection {
        if candidates.is_empty() {
            log::warn!("No vocabulary words available for selection");
            return Selection::empty();
        }

        let amount = self.sample_size.min(candidates.len());
        let mut ranked: Vec<ScoredPair> = rand::seq::index::sample(rng, candidates.len(), amount)
            .into_iter()
            .map(|i| {
                let pair = candidates[i].clone();
                let priority = calculate_priority(store.get(&pair.key()), now);
                ScoredPair { pair, priority }
            })
            .collect();

        // Stable, so equal scores stay in draw order
        ranked.sort_by(|a, b| b.priority.cmp(&a.priority));

        let selected_count = count.min(ranked.len());
        let bars = urgency_bars(&ranked, selected_count, self.bar_width);

        log::debug!(
            "Sampled {} of {} candidates, selected {}",
            ranked.len(),
            candidates.len(),
            selected_count
        );

        Selection {
            ranked,
            selected_count,
            bars,
        }
    }
}

/// Bar lengths proportional to each score over the batch maximum
pub fn urgency_bars(ranked: &[ScoredPair], selected_count: usize, width: usize) -> Vec<UrgencyBar> {
    let max = ranked.iter().map(|s| s.priority).max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }

    ranked
        .iter()
        .enumerate()
        .map(|(i, scored)| UrgencyBar {
            length: (scored.priority as u64 * width as u64 / max as u64) as usize,
            selected: i < selected_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::clock::FixedClock;
    use crate::tracking::models::WordKey;
    use crate::tracking::recorder::Recorder;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn vocab(n: usize) -> Vec<VocabularyPair> {
        (0..n)
            .map(|i| VocabularyPair::new(format!("mot{}", i), format!("word{}", i)))
            .collect()
    }

    fn empty_store() -> StatisticsStore {
        StatisticsStore::new(PathBuf::from("unused.json"))
    }

    #[test]
    fn test_empty_candidates() {
        let store = empty_store();
        for count in [0, 1, 20, 100] {
            let selection = Sampler::default().select(&store, &[], count, now(), &mut seeded_rng());
            assert!(selection.is_empty());
            assert!(selection.ranked.is_empty());
            assert!(selection.bars.is_empty());
        }
    }

    #[test]
    fn test_sample_is_bounded() {
        let store = empty_store();
        let candidates = vocab(100);
        let selection = Sampler::default().select(&store, &candidates, 20, now(), &mut seeded_rng());

        assert_eq!(selection.ranked.len(), 40);
        assert_eq!(selection.selected().count(), 20);
        assert_eq!(selection.bars.len(), 40);

        let unique: HashSet<_> = selection.ranked.iter().map(|s| s.pair.key()).collect();
        assert_eq!(unique.len(), 40);
        for scored in &selection.ranked {
            assert!(candidates.contains(&scored.pair));
        }
    }

    #[test]
    fn test_count_larger_than_pool() {
        let store = empty_store();
        let candidates = vocab(5);
        let selection = Sampler::default().select(&store, &candidates, 20, now(), &mut seeded_rng());
        assert_eq!(selection.into_selected().len(), 5);
    }

    #[test]
    fn test_same_seed_same_selection() {
        let store = empty_store();
        let candidates = vocab(80);
        let a = Sampler::default().select(&store, &candidates, 10, now(), &mut seeded_rng());
        let b = Sampler::default().select(&store, &candidates, 10, now(), &mut seeded_rng());
        assert_eq!(a.ranked, b.ranked);
    }

    #[test]
    fn test_ranked_by_descending_priority() {
        let mut store = empty_store();
        let candidates = vocab(10);
        let clock = FixedClock(now());
        {
            let mut recorder = Recorder::new(&mut store, &clock);
            // mot0: seen just now, understood -> 1
            recorder.mark_used("mot0", "word0");
            // mot1: missed twice just now -> 40 - 4 = 36
            recorder.mark_not_understood("mot1", "word1");
            recorder.mark_not_understood("mot1", "word1");
        }

        let selection = Sampler::default().select(&store, &candidates, 10, now(), &mut seeded_rng());
        let scores: Vec<u32> = selection.ranked.iter().map(|s| s.priority).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));

        // Eight unseen words first, then the missed word, then the known one
        assert_eq!(&scores[..8], &[100; 8]);
        assert_eq!(selection.ranked[8].pair.key(), WordKey::new("mot1", "word1"));
        assert_eq!(selection.ranked[8].priority, 36);
        assert_eq!(selection.ranked[9].pair.key(), WordKey::new("mot0", "word0"));
        assert_eq!(selection.ranked[9].priority, 1);
    }

    #[test]
    fn test_ties_keep_draw_order() {
        let store = empty_store();
        let candidates = vocab(30);

        let drawn: Vec<usize> =
            rand::seq::index::sample(&mut seeded_rng(), candidates.len(), 30).into_vec();
        let selection = Sampler::default().select(&store, &candidates, 30, now(), &mut seeded_rng());

        let expected: Vec<&VocabularyPair> = drawn.iter().map(|&i| &candidates[i]).collect();
        let actual: Vec<&VocabularyPair> = selection.selected().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_bars_follow_selection() {
        let mut store = empty_store();
        let candidates = vocab(4);
        let clock = FixedClock(now());
        Recorder::new(&mut store, &clock).mark_not_understood("mot2", "word2");

        let selection = Sampler::default().select(&store, &candidates, 2, now(), &mut seeded_rng());
        let lengths: Vec<usize> = selection.bars.iter().map(|b| b.length).collect();
        let marked: Vec<bool> = selection.bars.iter().map(|b| b.selected).collect();

        // Three new words at 100, the missed word at 18
        assert_eq!(lengths, vec![40, 40, 40, 7]);
        assert_eq!(marked, vec![true, true, false, false]);
    }

    #[test]
    fn test_urgency_bars_scale() {
        let ranked: Vec<ScoredPair> = [50u32, 25, 1]
            .iter()
            .map(|&priority| ScoredPair {
                pair: VocabularyPair::new("a", "b"),
                priority,
            })
            .collect();

        let bars = urgency_bars(&ranked, 1, 40);
        assert_eq!(bars[0], UrgencyBar { length: 40, selected: true });
        assert_eq!(bars[1], UrgencyBar { length: 20, selected: false });
        assert_eq!(bars[2], UrgencyBar { length: 0, selected: false });
        assert!(urgency_bars(&[], 0, 40).is_empty());
    }

    #[test]
    fn test_custom_sample_size() {
        let store = empty_store();
        let candidates = vocab(50);
        let selection = Sampler::new(12, 10).select(&store, &candidates, 20, now(), &mut seeded_rng());
        assert_eq!(selection.ranked.len(), 12);
        assert_eq!(selection.selected().count(), 12);
        assert!(selection.bars.iter().all(|b| b.length == 10));
    }

    #[test]
    fn test_oversized_settings_capped() {
        let store = empty_store();
        let candidates = vocab(100);
        let selection = Sampler::new(80, 80).select(&store, &candidates, 60, now(), &mut seeded_rng());
        assert_eq!(selection.ranked.len(), 40);
        assert_eq!(selection.selected().count(), 40);
        assert!(selection.bars.iter().all(|b| b.length <= 40));
        assert_eq!(selection.bars[0].length, 40);
    }
}
