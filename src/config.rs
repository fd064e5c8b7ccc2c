//! Application settings
//!
//! Read from `config.toml` in the data directory. Every field is optional;
//! a missing file means all defaults.
//!
//! ```toml
//! tracking_file = "/home/me/vocab/word_tracking.json"
//! sample_size = 40
//! session_size = 20
//! bar_width = 40
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tracking::sampler::{Sampler, DEFAULT_BAR_WIDTH, DEFAULT_SAMPLE_SIZE};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const TRACKING_FILE_NAME: &str = "word_tracking.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexisConfig {
    /// Tracking file location; defaults to the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_file: Option<PathBuf>,
    /// Candidates drawn at random before scoring, at most 40
    pub sample_size: usize,
    /// Words kept for a session
    pub session_size: usize,
    /// Width of a full urgency bar, at most 40
    pub bar_width: usize,
}

impl Default for LexisConfig {
    fn default() -> Self {
        Self {
            tracking_file: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
            session_size: 20,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

impl LexisConfig {
    /// Default data directory (e.g. ~/.local/share/lexis)
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("lexis"))
            .ok_or(ConfigError::DataDirNotFound)
    }

    /// Load `config.toml` from `data_dir`, falling back to defaults if absent
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=DEFAULT_SAMPLE_SIZE).contains(&self.sample_size) {
            return Err(ConfigError::Invalid(format!(
                "sample_size must be between 1 and {}",
                DEFAULT_SAMPLE_SIZE
            )));
        }
        if !(1..=DEFAULT_BAR_WIDTH).contains(&self.bar_width) {
            return Err(ConfigError::Invalid(format!(
                "bar_width must be between 1 and {}",
                DEFAULT_BAR_WIDTH
            )));
        }
        Ok(())
    }

    /// Tracking file path, resolving relative paths against `data_dir`
    pub fn tracking_path(&self, data_dir: &Path) -> PathBuf {
        match &self.tracking_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join(TRACKING_FILE_NAME),
        }
    }

    pub fn sampler(&self) -> Sampler {
        Sampler::new(self.sample_size, self.bar_width)
    }
}
