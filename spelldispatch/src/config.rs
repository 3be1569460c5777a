use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_CACHE_CAPACITY: usize = 1024;
const DEFAULT_MIN_SUGGESTIONS: usize = 1;
const DEFAULT_MAX_SUGGESTIONS: usize = 10;

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_min_suggestions() -> usize {
    DEFAULT_MIN_SUGGESTIONS
}

fn default_max_suggestions() -> usize {
    DEFAULT_MAX_SUGGESTIONS
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of known-bad words remembered by the worker.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_min_suggestions")]
    pub min_suggestions: usize,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Registry name of the backend; `None` means the permissive backend.
    #[serde(default)]
    pub backend: Option<String>,
    /// Word list consumed by the `wordlist` backend.
    #[serde(default)]
    pub dictionary: Option<PathBuf>,
}

impl EngineConfig {
    pub const fn default() -> EngineConfig {
        EngineConfig {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            min_suggestions: DEFAULT_MIN_SUGGESTIONS,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            backend: None,
            dictionary: None,
        }
    }

    pub fn from_json_str(input: &str) -> Result<EngineConfig, ConfigError> {
        let config: EngineConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        EngineConfig::from_json_str(&input)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_suggestions == 0 || self.min_suggestions > self.max_suggestions {
            return Err(ConfigError::InvalidSuggestionRange {
                min: self.min_suggestions,
                max: self.max_suggestions,
            });
        }

        Ok(())
    }

    /// Clamps a requested suggestion count into the configured range.
    #[inline]
    pub fn clamp_suggestions(&self, count: usize) -> usize {
        count.max(self.min_suggestions).min(self.max_suggestions)
    }
}
