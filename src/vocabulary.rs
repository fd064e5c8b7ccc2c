//! Candidate vocabulary lists
//!
//! A vocabulary file is a JSON array whose entries are either
//! `["source", "target"]`, `["source", "target", "pronunciation"]` or
//! `{"source": ..., "target": ..., "pronunciation": ...}`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tracking::VocabularyPair;

#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VocabularyError>;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Tuple(Vec<String>),
    Object {
        source: String,
        target: String,
        #[serde(default)]
        pronunciation: Option<String>,
    },
}

impl RawEntry {
    fn into_pair(self) -> Option<VocabularyPair> {
        let (source, target, pronunciation) = match self {
            RawEntry::Tuple(fields) => {
                let mut fields = fields.into_iter();
                match (fields.next(), fields.next(), fields.next(), fields.next()) {
                    (Some(s), Some(t), p, None) => (s, t, p),
                    _ => return None,
                }
            }
            RawEntry::Object {
                source,
                target,
                pronunciation,
            } => (source, target, pronunciation),
        };

        let source = source.trim().to_string();
        let target = target.trim().to_string();
        if source.is_empty() || target.is_empty() {
            return None;
        }

        Some(
            VocabularyPair::new(source, target)
                .with_pronunciation(pronunciation.unwrap_or_default().trim()),
        )
    }
}

/// Counts gathered while reading a vocabulary file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyStats {
    pub total: usize,
    pub skipped: usize,
    pub with_pronunciation: usize,
}

/// Parse candidate entries from JSON text, skipping unusable ones
pub fn parse_candidates(content: &str) -> Result<(Vec<VocabularyPair>, VocabularyStats)> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(content)?;
    let mut stats = VocabularyStats::default();
    let mut pairs = Vec::with_capacity(raw.len());

    for (index, value) in raw.into_iter().enumerate() {
        let pair = serde_json::from_value::<RawEntry>(value)
            .ok()
            .and_then(RawEntry::into_pair);
        match pair {
            Some(pair) => {
                if pair.has_pronunciation() {
                    stats.with_pronunciation += 1;
                }
                pairs.push(pair);
            }
            None => {
                log::warn!("Skipping vocabulary entry {}: expected 2 or 3 non-empty fields", index);
                stats.skipped += 1;
            }
        }
    }

    stats.total = pairs.len();
    Ok((pairs, stats))
}

/// Read candidates from a vocabulary file
pub fn load_candidates(path: &Path) -> Result<(Vec<VocabularyPair>, VocabularyStats)> {
    let content = fs::read_to_string(path)?;
    let (pairs, stats) = parse_candidates(&content)?;
    log::info!(
        "Loaded {} vocabulary words from {:?} ({} skipped, {} with pronunciation)",
        stats.total,
        path,
        stats.skipped,
        stats.with_pronunciation
    );
    Ok((pairs, stats))
}
