//! Renderer configuration.
//!
//! Configuration is plain data with serde defaults for every field, so a
//! YAML document only needs to name the values it changes:
//!
//! ```yaml
//! cache_capacity: 500
//! language: de
//! display: block
//! scoring:
//!   suppress_image_above: 60.0
//!   suppress_text_below: 2.5
//! ```
use crate::cache::{DEFAULT_CAPACITY, ScoringConfiguration};
use crate::common::{Error, Result};
use crate::render::DisplayMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Process-level settings for a [`crate::render::MathRenderer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of cached result bundles
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Thresholds applied when a request brings none of its own
    #[serde(default)]
    pub scoring: ScoringConfiguration,
    /// Display mode applied when a request does not set one
    #[serde(default)]
    pub display: DisplayMode,
    /// Spoken-language variant applied when a request does not set one
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            scoring: ScoringConfiguration::default(),
            display: DisplayMode::default(),
            language: default_language(),
        }
    }
}

impl Config {
    /// Parse configuration from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Config = serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))
    }

    /// Set cache capacity
    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    /// Set default scoring thresholds
    pub fn with_scoring(mut self, scoring: ScoringConfiguration) -> Self {
        self.scoring = scoring;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(Error::Config("language must not be empty".to_string()));
        }
        Ok(())
    }
}
