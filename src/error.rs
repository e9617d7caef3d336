//! # Error Types
//!
//! Custom error types for Turntable Keys using `thiserror`.

use thiserror::Error;

/// Main error type for Turntable Keys
#[derive(Debug, Error)]
pub enum ScratchError {
    /// The axis could not be read this cycle (device busy, momentarily gone)
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    /// No input device with an absolute axis was found
    #[error("No input devices with absolute axes found")]
    NoDevicesFound,

    /// Device index out of range
    #[error("Invalid device selection {index} (found {count} device(s))")]
    InvalidSelection { index: usize, count: usize },

    /// Selected axis is not reported by the device
    #[error("Axis {axis} is not supported by {path}")]
    AxisNotSupported { axis: String, path: String },

    /// Opening or querying an input device failed
    #[error("Device error: {0}")]
    Device(String),

    /// uinput virtual keyboard errors
    #[error("Virtual keyboard error: {0}")]
    VirtualKeyboard(String),

    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed configuration file
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScratchError {
    /// Whether the polling loop should skip the cycle instead of failing.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, ScratchError::DeviceUnavailable(_))
    }
}

/// Result type alias for Turntable Keys
pub type Result<T> = std::result::Result<T, ScratchError>;
