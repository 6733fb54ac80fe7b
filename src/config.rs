//! Configuration management for optotype
//!
//! Provides persistent configuration that is automatically saved to and loaded
//! from a platform-specific config file.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/optotype/config.toml` |
//! | macOS | `~/Library/Application Support/optotype/config.toml` |
//! | Windows | `%APPDATA%\optotype\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use optotype::Config;
//!
//! // Load existing config or use defaults
//! let mut config = Config::load().unwrap_or_default();
//!
//! // Modify settings
//! config.sequence.rows = 3;
//!
//! // Save to disk
//! config.save().expect("Failed to save config");
//! ```

use crate::engine::{ReclassifyPolicy, SizeList};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Error type for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to determine config directory
    NoConfigDir,
    /// IO error reading or writing config file
    Io(io::Error),
    /// Failed to parse config file
    Parse(toml::de::Error),
    /// Failed to serialize config
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Could not determine config directory"),
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("optotype");

    // Create directory if it doesn't exist
    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Test sequence settings
    pub sequence: SequenceConfig,
    /// Scale factor settings
    pub scale: ScaleConfig,
    /// UI settings
    pub ui: UiConfig,
}

/// Test sequence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Number of passes over the size list
    pub rows: usize,
    /// Largest target size in millimeters
    pub size_max_mm: f64,
    /// Smallest target size in millimeters
    pub size_min_mm: f64,
    /// Step between consecutive target sizes
    pub size_step_mm: f64,
    /// What a classifying key does to an already-classified item
    #[serde(default)]
    pub reclassify: ReclassifyPolicy,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            size_max_mm: 100.0,
            size_min_mm: 5.0,
            size_step_mm: 5.0,
            reclassify: ReclassifyPolicy::Overwrite,
        }
    }
}

impl SequenceConfig {
    /// Build the size list these settings describe.
    ///
    /// Falls back to the default 100..5 range when the configured range is
    /// invalid, so a hand-edited config file cannot break session start.
    pub fn size_list(&self) -> SizeList {
        SizeList::descending(self.size_max_mm, self.size_min_mm, self.size_step_mm)
            .unwrap_or_else(|e| {
                log::warn!("invalid configured size range ({}), using defaults", e);
                SizeList::default_range()
            })
    }
}

/// Scale factor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// Starting scale factor in pixels per millimeter
    pub default_factor: f64,
    /// Lower bound of the slider range
    pub min_factor: f64,
    /// Upper bound of the slider range
    pub max_factor: f64,
    /// Slider step size
    pub step: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            default_factor: 1.0,
            min_factor: 0.1,
            max_factor: 10.0,
            step: 0.1,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Refresh rate for UI updates (in Hz)
    pub refresh_rate_hz: u32,
    /// Color theme (dark/light)
    pub theme: Theme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_hz: 60,
            theme: Theme::Dark,
        }
    }
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a specific path.
    ///
    /// Useful for testing or using custom config locations.
    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get UI refresh interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.ui.refresh_rate_hz as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path() -> PathBuf {
        env::temp_dir().join(format!("optotype-test-{}.toml", std::process::id()))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.sequence.rows, 5);
        assert_eq!(config.sequence.size_max_mm, 100.0);
        assert_eq!(config.sequence.size_min_mm, 5.0);
        assert_eq!(config.sequence.size_step_mm, 5.0);
        assert_eq!(config.sequence.reclassify, ReclassifyPolicy::Overwrite);
        assert_eq!(config.scale.default_factor, 1.0);
        assert_eq!(config.scale.min_factor, 0.1);
        assert_eq!(config.scale.max_factor, 10.0);
        assert_eq!(config.ui.refresh_rate_hz, 60);
        assert_eq!(config.ui.theme, Theme::Dark);
    }

    #[test]
    fn config_refresh_interval() {
        let config = Config::default();
        // 60 Hz = 16666 microseconds per frame
        let interval = config.refresh_interval();
        assert_eq!(interval.as_micros(), 16666);
    }

    #[test]
    fn default_sequence_config_builds_twenty_sizes() {
        let config = Config::default();
        let sizes = config.sequence.size_list();
        assert_eq!(sizes.len(), 20);
    }

    #[test]
    fn invalid_size_range_falls_back_to_default() {
        let mut config = Config::default();
        config.sequence.size_step_mm = 0.0;
        let sizes = config.sequence.size_list();
        assert_eq!(sizes, SizeList::default_range());
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path();

        // Create non-default config
        let mut config = Config::default();
        config.sequence.rows = 3;
        config.ui.theme = Theme::Light;
        config.sequence.reclassify = ReclassifyPolicy::KeepFirst;

        // Save to temp file
        config.save_to(&path).expect("Failed to save config");

        // Load it back
        let loaded = Config::load_from(&path).expect("Failed to load config");

        // Verify values match
        assert_eq!(loaded.sequence.rows, 3);
        assert_eq!(loaded.ui.theme, Theme::Light);
        assert_eq!(loaded.sequence.reclassify, ReclassifyPolicy::KeepFirst);

        // Cleanup
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/path/config.toml");

        // load_from should fail with IO error
        let result = Config::load_from(&path);
        assert!(result.is_err());
    }

    #[test]
    fn config_serializes_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        assert!(toml_str.contains("[sequence]"));
        assert!(toml_str.contains("[scale]"));
        assert!(toml_str.contains("[ui]"));
        assert!(toml_str.contains("rows = 5"));
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml_str = r#"
[sequence]
rows = 2
size_max_mm = 50.0
size_min_mm = 10.0
size_step_mm = 10.0
reclassify = "KeepFirst"

[scale]
default_factor = 2.0
min_factor = 0.5
max_factor = 5.0
step = 0.5

[ui]
refresh_rate_hz = 144
theme = "Light"
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(config.sequence.rows, 2);
        assert_eq!(config.sequence.size_max_mm, 50.0);
        assert_eq!(config.sequence.reclassify, ReclassifyPolicy::KeepFirst);
        assert_eq!(config.scale.default_factor, 2.0);
        assert_eq!(config.scale.step, 0.5);
        assert_eq!(config.ui.refresh_rate_hz, 144);
        assert_eq!(config.ui.theme, Theme::Light);
    }

    #[test]
    fn reclassify_defaults_when_absent() {
        let toml_str = r#"
[sequence]
rows = 5
size_max_mm = 100.0
size_min_mm = 5.0
size_step_mm = 5.0

[scale]
default_factor = 1.0
min_factor = 0.1
max_factor = 10.0
step = 0.1

[ui]
refresh_rate_hz = 60
theme = "Dark"
"#;
        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(config.sequence.reclassify, ReclassifyPolicy::Overwrite);
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(err.to_string(), "Could not determine config directory");

        let io_err = ConfigError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(io_err.to_string().contains("IO error"));
    }

    #[test]
    fn theme_equality() {
        assert_eq!(Theme::Dark, Theme::Dark);
        assert_ne!(Theme::Dark, Theme::Light);
    }
}
