//! Configuration management for feature extraction runs
//!
//! This module provides runtime configuration loading from JSON files so the
//! trailing window, batch policy and worker count can be changed without
//! recompiling.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analysis::features::DEFAULT_TRAILING_WINDOW;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "track_features.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub extraction: ExtractionConfig,
    pub batch: BatchConfig,
    pub output: OutputConfig,
}

/// Feature extraction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of trailing sections summarised by the `last_*` features
    pub trailing_window: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            trailing_window: DEFAULT_TRAILING_WINDOW,
        }
    }
}

/// Batch assembly parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Abort the whole batch on the first failing track
    pub strict: bool,
    /// Dedicated worker count; `None` uses the global rayon pool
    pub worker_threads: Option<usize>,
}

/// Report output parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON reports
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or the defaults when the file is missing
    /// or its JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::read(path) {
            Ok(config) => {
                log::info!("[Config] using {}", path.display());
                config
            }
            Err(reason) => {
                log::warn!("[Config] {}, falling back to defaults", reason);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|err| format!("cannot read {}: {}", path.display(), err))?;
        serde_json::from_str(&contents)
            .map_err(|err| format!("invalid config {}: {}", path.display(), err))
    }

    /// Load `track_features.json` from the working directory
    pub fn load() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.extraction.trailing_window, 5);
        assert!(!config.batch.strict);
        assert_eq!(config.batch.worker_threads, None);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = AppConfig::default();
        config.batch.worker_threads = Some(4);
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: AppConfig = serde_json::from_str(r#"{"batch": {"strict": true}}"#).unwrap();
        assert!(parsed.batch.strict);
        assert_eq!(parsed.extraction.trailing_window, 5);
        assert!(parsed.output.pretty);
    }

    #[test]
    fn test_load_from_file_reads_values() {
        let path = std::env::temp_dir().join(format!(
            "track_features_config_{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{"extraction": {"trailing_window": 8}}"#).unwrap();
        let config = AppConfig::load_from_file(&path);
        fs::remove_file(&path).unwrap();

        assert_eq!(config.extraction.trailing_window, 8);
        assert!(!config.batch.strict);
    }

    #[test]
    fn test_invalid_json_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!(
            "track_features_invalid_{}.json",
            std::process::id()
        ));
        fs::write(&path, "{ not json").unwrap();
        let config = AppConfig::load_from_file(&path);
        fs::remove_file(&path).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_file("/nonexistent/track_features.json");
        assert_eq!(config, AppConfig::default());
    }
}
