//! Persistent word statistics
//!
//! The tracking file is a single JSON object:
//! ```text
//! {
//!   "bonjour|hello": {
//!     "word": "bonjour",
//!     "translation": "hello",
//!     "occurrences": [{ "date": "2024-06-01T09:30:00.000000", "repeat": false }]
//!   }
//! }
//! ```
//! The whole file is rewritten on every save.

use std::collections::btree_map::{self, BTreeMap};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;

use super::models::{Occurrence, WordKey, WordRecord};

#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to replace tracking file {path:?}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, TrackingError>;

/// How the tracking file was found at load time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No file yet; starting with empty statistics
    Missing,
    /// File read and parsed
    Loaded,
    /// File present but unreadable or not a JSON object; starting empty
    Unreadable(String),
}

/// Diagnostics from [`StatisticsStore::load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub status: LoadStatus,
    /// Number of records held after loading
    pub records: usize,
    /// Persisted keys whose entries had to be rebuilt
    pub repaired_keys: Vec<String>,
    /// Persisted keys whose history was merged into an earlier entry for
    /// the same word
    pub merged_keys: Vec<String>,
}

impl LoadReport {
    fn empty(status: LoadStatus) -> Self {
        Self {
            status,
            records: 0,
            repaired_keys: Vec::new(),
            merged_keys: Vec::new(),
        }
    }

    pub fn repaired(&self) -> usize {
        self.repaired_keys.len()
    }
}

/// Word statistics backed by a JSON file
///
/// Lifecycle: [`new`](Self::new) → [`load`](Self::load) → mutate through a
/// [`Recorder`](super::Recorder) → [`save`](Self::save).
#[derive(Debug)]
pub struct StatisticsStore {
    path: PathBuf,
    records: BTreeMap<WordKey, WordRecord>,
}

impl StatisticsStore {
    /// Create an empty store bound to `path`. Nothing is read until `load`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            records: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory statistics with the contents of the tracking file.
    ///
    /// Never fails: a missing file yields empty statistics, an unreadable one
    /// is reported and also yields empty statistics. Malformed entries are
    /// rebuilt from their keys.
    pub fn load(&mut self) -> LoadReport {
        self.records.clear();

        if !self.path.exists() {
            log::info!("No tracking file at {:?}, starting fresh", self.path);
            return LoadReport::empty(LoadStatus::Missing);
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to read tracking file {:?}: {}", self.path, e);
                return LoadReport::empty(LoadStatus::Unreadable(e.to_string()));
            }
        };

        let entries: Map<String, Value> = match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Tracking file {:?} is not valid, starting fresh: {}", self.path, e);
                return LoadReport::empty(LoadStatus::Unreadable(e.to_string()));
            }
        };

        let validated = validate_entries(entries);
        self.records = validated.records;

        log::info!(
            "Loaded {} tracked words from {:?} ({} repaired, {} merged)",
            self.records.len(),
            self.path,
            validated.repaired_keys.len(),
            validated.merged_keys.len()
        );

        LoadReport {
            status: LoadStatus::Loaded,
            records: self.records.len(),
            repaired_keys: validated.repaired_keys,
            merged_keys: validated.merged_keys,
        }
    }

    /// Write all statistics to the tracking file, replacing it atomically
    pub fn save(&self) -> Result<()> {
        let parent_dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent_dir)?;

        let serialized: BTreeMap<String, &WordRecord> = self
            .records
            .iter()
            .map(|(key, record)| (key.encode(), record))
            .collect();

        let temp_file = NamedTempFile::new_in(parent_dir)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            serde_json::to_writer_pretty(&mut writer, &serialized)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        temp_file.persist(&self.path).map_err(|e| TrackingError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;

        log::info!("Saved {} tracked words to {:?}", self.records.len(), self.path);
        Ok(())
    }

    pub fn get(&self, key: &WordKey) -> Option<&WordRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &WordKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, WordKey, WordRecord> {
        self.records.iter()
    }

    /// Record for `key`, created empty if absent
    pub(crate) fn record_mut(&mut self, key: &WordKey) -> &mut WordRecord {
        self.records
            .entry(key.clone())
            .or_insert_with(|| WordRecord::new(key))
    }
}

struct ValidatedEntries {
    records: BTreeMap<WordKey, WordRecord>,
    repaired_keys: Vec<String>,
    merged_keys: Vec<String>,
}

/// Check every persisted entry and rebuild the ones that are malformed.
///
/// An entry is kept as-is when it is an object whose `occurrences` is a list
/// and whose `word`/`translation` match its key. Otherwise it is rebuilt
/// from the key, keeping whatever occurrence list it carries. Entries that
/// end up on the same word are merged.
fn validate_entries(entries: Map<String, Value>) -> ValidatedEntries {
    let mut validated = ValidatedEntries {
        records: BTreeMap::new(),
        repaired_keys: Vec::new(),
        merged_keys: Vec::new(),
    };

    for (encoded, value) in entries {
        let decoded = WordKey::decode(&encoded);

        let stored = serde_json::from_value::<StoredRecord>(value.clone()).ok();
        let (key, record) = match stored.and_then(|s| s.into_record(&decoded, &encoded)) {
            Some(record) => (record.key(), record),
            None => {
                log::warn!("Repairing corrupted tracking entry: {}", encoded);
                validated.repaired_keys.push(encoded.clone());
                let mut record = WordRecord::new(&decoded);
                record.occurrences = salvage_occurrences(&value);
                (decoded, record)
            }
        };

        match validated.records.entry(key) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(record);
            }
            btree_map::Entry::Occupied(mut slot) => {
                log::warn!(
                    "Tracking entry {} duplicates word {}, merging history",
                    encoded,
                    slot.key()
                );
                merge_history(slot.get_mut(), record.occurrences);
                validated.merged_keys.push(encoded);
            }
        }
    }

    validated
}

/// Append `extra` and restore chronological order; unreadable dates sort first
fn merge_history(record: &mut WordRecord, extra: Vec<Occurrence>) {
    record.occurrences.extend(extra);
    record.occurrences.sort_by_key(Occurrence::timestamp);
}

/// Persisted entry: `occurrences` must be a list, its items are read leniently
#[derive(serde::Deserialize)]
struct StoredRecord {
    word: Option<String>,
    translation: Option<String>,
    occurrences: Vec<Occurrence>,
}

impl StoredRecord {
    /// The record, if its names agree with the key it was stored under.
    ///
    /// Files written before separators were escaped store `a|b|c` verbatim;
    /// such keys are accepted when the plain join of the names matches.
    fn into_record(self, key: &WordKey, encoded: &str) -> Option<WordRecord> {
        let (word, translation) = (self.word?, self.translation?);
        let matches_key = word == key.word && translation == key.translation;
        let matches_legacy = format!("{}|{}", word, translation) == encoded;
        if !(matches_key || matches_legacy) {
            return None;
        }
        Some(WordRecord {
            word,
            translation,
            occurrences: self.occurrences,
        })
    }
}

/// Occurrence list of a malformed entry, empty when it has none
fn salvage_occurrences(value: &Value) -> Vec<Occurrence> {
    value
        .get("occurrences")
        .and_then(Value::as_array)
        .map(|items| items.iter().cloned().map(Occurrence::from).collect())
        .unwrap_or_default()
}
