use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lexis_lib::tracking::{LoadReport, LoadStatus, StatisticsStore, SystemClock, VocabularyPair};
use lexis_lib::vocabulary::{self, VocabularyStats};
use lexis_lib::LexisConfig;

/// Shared application state for CLI commands
pub struct App {
    pub config: LexisConfig,
    pub store: StatisticsStore,
    pub load_report: LoadReport,
    pub clock: SystemClock,
}

impl App {
    /// Load config and statistics from `data_dir` (or the default data directory)
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => LexisConfig::default_data_dir().context("Failed to get data directory")?,
        };

        let config = LexisConfig::load(&data_dir)
            .with_context(|| format!("Failed to load config from {:?}", data_dir))?;

        let mut store = StatisticsStore::new(config.tracking_path(&data_dir));
        let load_report = store.load();

        if let LoadStatus::Unreadable(reason) = &load_report.status {
            eprintln!(
                "Warning: could not read {} ({}); starting with empty statistics",
                store.path().display(),
                reason
            );
        }
        if load_report.repaired() > 0 {
            eprintln!(
                "Warning: repaired {} corrupted tracking entries",
                load_report.repaired()
            );
        }

        Ok(Self {
            config,
            store,
            load_report,
            clock: SystemClock,
        })
    }

    /// Read the candidate pool for a session
    pub fn load_vocabulary(&self, path: &Path) -> Result<(Vec<VocabularyPair>, VocabularyStats)> {
        vocabulary::load_candidates(path)
            .with_context(|| format!("Failed to read vocabulary file {:?}", path))
    }

    pub fn session_size(&self, count: Option<usize>) -> usize {
        count.unwrap_or(self.config.session_size)
    }

    /// Seeded RNG when a seed is given, otherwise seeded from the OS
    pub fn rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.store
            .save()
            .with_context(|| format!("Failed to save statistics to {:?}", self.store.path()))
    }
}
