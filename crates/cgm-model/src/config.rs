//! Editor configuration
//!
//! Settings are stored as RON and fall back to defaults field by field.

use std::path::Path;

use serde::{Deserialize, Serialize};

use cgm_core::{TweenRotations, TweenVectors};

use crate::constants::{DEFAULT_HISTORY_DEPTH, DEFAULT_NUM_SAMPLES};

/// Score (staff plotting) configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreConfig {
    /// Interpolated samples per sparkline (0 plots keyframes only)
    pub num_samples: usize,
    pub tween_rotations: TweenRotations,
    pub tween_translations: TweenVectors,
    pub tween_scales: TweenVectors,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            num_samples: DEFAULT_NUM_SAMPLES,
            tween_rotations: TweenRotations::default(),
            tween_translations: TweenVectors::default(),
            tween_scales: TweenVectors::default(),
        }
    }
}

/// Edit history configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo checkpoints kept
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    pub score: ScoreConfig,
    pub history: HistoryConfig,
}

impl EditorConfig {
    /// Parse a configuration from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Render the configuration as pretty RON
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&text)?;
        tracing::info!("Loaded editor config from {:?}", path);
        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_ron_string()?)?;
        tracing::info!("Saved editor config to {:?}", path);
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = EditorConfig::from_ron_str("(score: (num_samples: 40))").unwrap();
        assert_eq!(config.score.num_samples, 40);
        assert_eq!(config.score.tween_rotations, TweenRotations::Nlerp);
        assert_eq!(config.history, HistoryConfig::default());
    }

    #[test]
    fn test_invalid_config_is_parse_error() {
        let result = EditorConfig::from_ron_str("(score: (num_samples: \"many\"))");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.ron");

        let mut config = EditorConfig::default();
        config.score.num_samples = 0;
        config.score.tween_rotations = TweenRotations::Slerp;
        config.history.max_depth = 5;
        config.save(&path).unwrap();

        assert_eq!(EditorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EditorConfig::load(dir.path().join("absent.ron"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
