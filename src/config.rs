// ⚙️ Configuration - per-show settings with sensible defaults
// An optional config.json in the show location overrides any field.

use crate::error::{Result, ShowError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Most entries a single contestant may hold in one class
pub const MAX_ENTRIES_PER_CLASS: usize = 2;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    /// Per-class cap on one contestant's entries
    pub max_entries_per_class: usize,

    /// Ledger of registration rows
    pub contestant_file: String,

    /// Allocated show: classes, placements, manual prizes
    pub show_file: String,

    /// Optional taxonomy override; the built-in one is used when absent
    pub taxonomy_file: String,

    /// Optional prize catalogue; the standing trophies are used when absent
    pub prize_file: String,
}

impl Default for ShowConfig {
    fn default() -> Self {
        ShowConfig {
            max_entries_per_class: MAX_ENTRIES_PER_CLASS,
            contestant_file: "contestants.json".to_string(),
            show_file: "classes.json".to_string(),
            taxonomy_file: "taxonomy.json".to_string(),
            prize_file: "prizes.json".to_string(),
        }
    }
}

impl ShowConfig {
    /// Load `config.json` from the show location, falling back to defaults
    pub fn load(location: &Path) -> Result<Self> {
        let path = location.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(ShowConfig::default());
        }

        let text = fs::read_to_string(&path).map_err(|e| ShowError::io(&path, e))?;
        let config: ShowConfig = serde_json::from_str(&text)
            .map_err(|source| ShowError::Serialization { path: path.clone(), source })?;

        if config.max_entries_per_class == 0 {
            return Err(ShowError::Consistency(format!(
                "{}: max_entries_per_class must be at least 1",
                path.display()
            )));
        }

        tracing::debug!(path = %path.display(), "loaded show configuration");
        Ok(config)
    }

    pub fn contestant_path(&self, location: &Path) -> PathBuf {
        location.join(&self.contestant_file)
    }

    pub fn show_path(&self, location: &Path) -> PathBuf {
        location.join(&self.show_file)
    }

    pub fn taxonomy_path(&self, location: &Path) -> PathBuf {
        location.join(&self.taxonomy_file)
    }

    pub fn prize_path(&self, location: &Path) -> PathBuf {
        location.join(&self.prize_file)
    }
}
