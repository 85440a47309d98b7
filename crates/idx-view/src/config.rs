//! Viewer configuration, loaded from TOML and overridden from the command line.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Settings for one viewing session.
///
/// ```toml
/// batch_size = 25
/// batch_delay_ms = 50
/// start_index = 7
/// images = "t10k-images-idx3-ubyte"
/// mismatches = "incorrect_predictions"
/// parameters = "parameters"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Records rendered between two yields.
    pub batch_size: usize,
    /// Pause between batches; `0` only yields to other tasks.
    pub batch_delay_ms: u64,
    /// Index the browser shows first. Clamped into range.
    pub start_index: usize,
    /// IDX resource with the images to browse.
    pub images: String,
    /// JSON resource with `[index, actual, predicted]` triples.
    pub mismatches: String,
    /// Optional IDX resource whose images are shown captioned by index.
    pub parameters: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            batch_delay_ms: 100,
            start_index: 0,
            images: "test-images".to_string(),
            mismatches: "incorrect_predictions".to_string(),
            parameters: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".into()));
        }
        if self.images.is_empty() || self.mismatches.is_empty() {
            return Err(ConfigError::Invalid("resource names must not be empty".into()));
        }
        Ok(())
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}
