//! Error types for BMA423-IO

use crate::settings::{OversampleRate, PerformanceMode};
use embedded_hal::i2c::ErrorKind;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// BMA423-IO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I2C bus error
    #[error("I2C bus error: {0:?}")]
    Bus(ErrorKind),

    /// Chip ID did not match the BMA423
    #[error("Failed to find BMA423: chip id {found:#04x}")]
    DeviceNotFound {
        /// Chip ID read from the device
        found: u8,
    },

    /// Register holds a reserved or unknown code
    #[error("Invalid value {value:#04x} in register {register:#04x}")]
    InvalidRegisterValue {
        /// Register address
        register: u8,
        /// Raw field value
        value: u8,
    },

    /// Oversample code is reserved in the requested filter mode
    #[error("Oversample rate {osr} is reserved in {mode} mode")]
    UnsupportedOversampleRate {
        /// Requested oversample setting
        osr: OversampleRate,
        /// Filter mode it was requested for
        mode: PerformanceMode,
    },

    /// Unknown device type in configuration
    #[error("Unknown device type: {0}")]
    UnknownDevice(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration serialize error
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Linux I2C device could not be opened
    #[error("Linux I2C error: {0}")]
    Linux(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map any embedded-hal I2C error into [`Error::Bus`]
    pub fn bus<E: embedded_hal::i2c::Error>(err: E) -> Self {
        Error::Bus(err.kind())
    }
}
