//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field is optional; an empty file (or no file at all)
//! yields the defaults below.
//!
//! ```toml
//! [device]
//! index = 0
//! axis = "X"
//!
//! [detector]
//! min_ticks = 1
//! stop_threshold = 10
//!
//! [polling]
//! interval_ms = 1
//! unavailable_warn_after = 1000
//!
//! [logging]
//! level = "info"
//! directory = ""
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::controller::AxisSelector;
use crate::error::{Result, ScratchError};
use crate::scratch::detector::{
    DetectorConfig, DEFAULT_MIN_TICKS, DEFAULT_STOP_THRESHOLD, MIN_TICKS_MAX, MIN_TICKS_MIN,
    STOP_THRESHOLD_MAX, STOP_THRESHOLD_MIN,
};

/// Accepted log levels.
const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub detector: DetectorSettings,
    pub polling: PollingConfig,
    pub logging: LoggingConfig,
}

/// Input device configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DeviceConfig {
    /// Index into the device listing; first device when unset.
    #[serde(default)]
    pub index: Option<usize>,

    /// Explicit `/dev/input/eventN` path; wins over `index` when set.
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub axis: AxisSelector,
}

/// Scratch detector configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DetectorSettings {
    #[serde(default = "default_min_ticks")]
    pub min_ticks: u32,

    /// Still samples tolerated before release.
    #[serde(default = "default_stop_threshold")]
    pub stop_threshold: u32,
}

/// Polling loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Consecutive failed reads before a warning is logged.
    #[serde(default = "default_unavailable_warn_after")]
    pub unavailable_warn_after: u32,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily log files; console only when empty.
    #[serde(default)]
    pub directory: String,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            min_ticks: default_min_ticks(),
            stop_threshold: default_stop_threshold(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            unavailable_warn_after: default_unavailable_warn_after(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
        }
    }
}

// Default value functions
fn default_min_ticks() -> u32 { DEFAULT_MIN_TICKS }
fn default_stop_threshold() -> u32 { DEFAULT_STOP_THRESHOLD }

fn default_interval_ms() -> u64 { 1 }
fn default_unavailable_warn_after() -> u32 { 1000 }

fn default_log_level() -> String { "info".to_string() }

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails (including an unknown axis letter)
    ///
    /// Values are not range-checked here; call [`Config::validate`] once any
    /// command line overrides are applied.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use turntable_keys::config::Config;
    ///
    /// let config = Config::load("turntable.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// Detector values are not checked here; they are clamped by
    /// [`Config::detector_config`].
    ///
    /// # Errors
    ///
    /// Returns `Config` if any other value is out of its valid range
    pub fn validate(&self) -> Result<()> {
        if self.polling.interval_ms == 0 || self.polling.interval_ms > 1000 {
            return Err(ScratchError::Config(
                "interval_ms must be between 1 and 1000".to_string(),
            ));
        }

        if self.polling.unavailable_warn_after == 0 {
            return Err(ScratchError::Config(
                "unavailable_warn_after must be greater than 0".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ScratchError::Config(format!(
                "log level must be one of: {}",
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Builds the detector configuration, clamping out-of-range values.
    ///
    /// # Examples
    ///
    /// ```
    /// use turntable_keys::config::Config;
    ///
    /// let mut config = Config::default();
    /// config.detector.min_ticks = 50;
    /// assert_eq!(config.detector_config().min_ticks(), 10);
    /// ```
    #[must_use]
    pub fn detector_config(&self) -> DetectorConfig {
        let settings = &self.detector;

        if !(MIN_TICKS_MIN..=MIN_TICKS_MAX).contains(&settings.min_ticks) {
            warn!(
                "min_ticks {} out of range, clamping to {}-{}",
                settings.min_ticks, MIN_TICKS_MIN, MIN_TICKS_MAX
            );
        }

        if !(STOP_THRESHOLD_MIN..=STOP_THRESHOLD_MAX).contains(&settings.stop_threshold) {
            warn!(
                "stop_threshold {} out of range, clamping to {}-{}",
                settings.stop_threshold, STOP_THRESHOLD_MIN, STOP_THRESHOLD_MAX
            );
        }

        DetectorConfig::new(settings.min_ticks, settings.stop_threshold)
    }

    /// Explicit device path, if one was configured.
    #[must_use]
    pub fn device_path(&self) -> Option<&str> {
        let path = self.device.path.trim();
        (!path.is_empty()).then_some(path)
    }

    /// Log file directory, if file logging is enabled.
    #[must_use]
    pub fn log_directory(&self) -> Option<&str> {
        let dir = self.logging.directory.trim();
        (!dir.is_empty()).then_some(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load_str(toml_content: &str) -> Result<Config> {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        Config::load(temp_file.path())
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.device.index, None);
        assert_eq!(config.device.axis, AxisSelector::X);
        assert_eq!(config.device_path(), None);
        assert_eq!(config.log_directory(), None);
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_min_ticks(), 1);
        assert_eq!(default_stop_threshold(), 10);
        assert_eq!(default_interval_ms(), 1);
        assert_eq!(default_unavailable_warn_after(), 1000);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn test_load_empty_file() {
        let config = load_str("").unwrap();
        assert_eq!(config.detector.min_ticks, 1);
        assert_eq!(config.polling.interval_ms, 1);
    }

    #[test]
    fn test_load_config_from_file() {
        let config = load_str(
            r#"
[device]
index = 1
axis = "r"

[detector]
min_ticks = 3
stop_threshold = 20

[polling]
interval_ms = 2

[logging]
level = "debug"
directory = "./logs"
"#,
        )
        .unwrap();

        assert_eq!(config.device.index, Some(1));
        assert_eq!(config.device.axis, AxisSelector::R);
        assert_eq!(config.detector_config(), DetectorConfig::new(3, 20));
        assert_eq!(config.polling.interval_ms, 2);
        assert_eq!(config.polling.unavailable_warn_after, 1000);
        assert_eq!(config.log_directory(), Some("./logs"));
    }

    #[test]
    fn test_shipped_default_config() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");
        let config = Config::load(path).unwrap();

        assert_eq!(config.device.index, None);
        assert_eq!(config.device_path(), None);
        assert_eq!(config.detector_config(), DetectorConfig::default());
        assert_eq!(config.polling.interval_ms, default_interval_ms());
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config = load_str("[detector]\nmin_ticks = 4\n").unwrap();
        assert_eq!(config.detector.min_ticks, 4);
        assert_eq!(config.detector.stop_threshold, 10);
    }

    #[test]
    fn test_unknown_axis_rejected() {
        match load_str("[device]\naxis = \"W\"\n") {
            Err(ScratchError::ConfigParse(_)) => {}
            other => panic!("Expected ConfigParse error, got: {:?}", other),
        }
    }

    #[test]
    fn test_load_defers_range_checks() {
        let config = load_str("[polling]\ninterval_ms = 0\n").unwrap();
        assert_eq!(config.polling.interval_ms, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/turntable.toml"),
            Err(ScratchError::Io(_))
        ));
    }

    #[test]
    fn test_detector_values_clamped() {
        let mut config = Config::default();
        config.detector.min_ticks = 0;
        config.detector.stop_threshold = 5000;
        assert!(config.validate().is_ok());

        let detector = config.detector_config();
        assert_eq!(detector.min_ticks(), 1);
        assert_eq!(detector.stop_threshold(), 1000);
    }

    #[test]
    fn test_interval_zero() {
        let mut config = Config::default();
        config.polling.interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_interval_too_high() {
        let mut config = Config::default();
        config.polling.interval_ms = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unavailable_warn_after_zero() {
        let mut config = Config::default();
        config.polling.unavailable_warn_after = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_levels() {
        for level in ["error", "WARN", "info", "debug", "trace"] {
            let mut config = Config::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "Level {} should be valid", level);
        }

        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_device_path_trimmed() {
        let mut config = Config::default();
        config.device.path = "  ".to_string();
        assert_eq!(config.device_path(), None);
        config.device.path = "/dev/input/event7".to_string();
        assert_eq!(config.device_path(), Some("/dev/input/event7"));
    }
}
