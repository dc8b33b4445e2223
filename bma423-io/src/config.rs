//! Configuration for the BMA423-IO daemon
//!
//! Loaded from a TOML file. Every section and field is optional; missing
//! values fall back to a simulated sensor sampled twice a second.

use crate::devices::mock::config::SimulationConfig;
use crate::error::Result;
use crate::settings::AccelConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub sensor: AccelConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which bus the sensor sits on
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceConfig {
    /// Device type: "linux" (real I2C) or "mock" (simulated)
    #[serde(rename = "type", default = "default_device_type")]
    pub device_type: String,

    /// I2C character device for the "linux" type
    #[serde(default = "default_bus")]
    pub bus: String,

    /// 7-bit I2C address (0x19 with SDO high, 0x18 with SDO low)
    #[serde(default = "default_address")]
    pub address: u8,

    /// Simulated sensor parameters for the "mock" type
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_device_type() -> String {
    "mock".to_string()
}
fn default_bus() -> String {
    "/dev/i2c-1".to_string()
}
fn default_address() -> u8 {
    0x19
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_type: default_device_type(),
            bus: default_bus(),
            address: default_address(),
            simulation: SimulationConfig::default(),
        }
    }
}

/// Sampling loop parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SamplingConfig {
    /// Delay between reads (ms)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Stop after this many samples, 0 = until shutdown
    #[serde(default)]
    pub max_samples: u64,

    /// Log temperature every N samples, 0 = never
    #[serde(default = "default_temperature_every")]
    pub temperature_every: u64,

    /// Give up after this many failed reads in a row
    #[serde(default = "default_max_consecutive_errors")]
    pub max_consecutive_errors: u32,
}

fn default_interval_ms() -> u64 {
    500
}
fn default_temperature_every() -> u64 {
    10
}
fn default_max_consecutive_errors() -> u32 {
    5
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_samples: 0,
            temperature_every: default_temperature_every(),
            max_consecutive_errors: default_max_consecutive_errors(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error), `RUST_LOG` wins
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use bma423_io::config::AppConfig;
    ///
    /// let config = AppConfig::from_file("bma423io.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration, or fall back to defaults when `path` does not exist
    ///
    /// The flag is `true` when the file was read. A file that exists but
    /// does not parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            Ok((Self::from_file(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AccRange, OutputDataRate, OversampleRate, PerformanceMode};

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.device.device_type, "mock");
        assert_eq!(config.device.bus, "/dev/i2c-1");
        assert_eq!(config.device.address, 0x19);
        assert_eq!(config.sensor.acc_range, AccRange::G4);
        assert_eq!(config.sampling.interval_ms, 500);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.device.device_type, "mock");
        assert_eq!(config.sampling, SamplingConfig::default());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
[device]
type = "linux"
bus = "/dev/i2c-0"
address = 0x18

[sensor]
acc_range = "8g"
output_data_rate = "12.5hz"
oversample_rate = "avg32"
performance_mode = "averaging"

[sampling]
interval_ms = 100
max_samples = 20

[logging]
level = "debug"
"#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.device.device_type, "linux");
        assert_eq!(config.device.bus, "/dev/i2c-0");
        assert_eq!(config.device.address, 0x18);
        assert_eq!(config.sensor.acc_range, AccRange::G8);
        assert_eq!(config.sensor.output_data_rate, OutputDataRate::Hz12_5);
        assert_eq!(config.sensor.oversample_rate, OversampleRate::Avg32);
        assert_eq!(config.sensor.performance_mode, PerformanceMode::Averaging);
        assert_eq!(config.sampling.interval_ms, 100);
        assert_eq!(config.sampling.max_samples, 20);
        assert_eq!(config.sampling.temperature_every, 10);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_setting_rejected() {
        let result: std::result::Result<AppConfig, _> = toml::from_str(
            r#"
[sensor]
acc_range = "3g"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bma423io.toml");

        let mut config = AppConfig::default();
        config.sensor.acc_range = AccRange::G16;
        config.device.simulation.random_seed = 9;
        config.to_file(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[device]"));
        assert!(contents.contains("acc_range = \"16g\""));

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded.sensor.acc_range, AccRange::G16);
        assert_eq!(loaded.device.simulation.random_seed, 9);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (config, loaded) = AppConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert!(!loaded);
        assert_eq!(config.device.device_type, "mock");
        assert_eq!(config.sampling, SamplingConfig::default());
    }

    #[test]
    fn test_load_or_default_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bma423io.toml");
        fs::write(&path, "[sampling]\ninterval_ms = 50\n").unwrap();

        let (config, loaded) = AppConfig::load_or_default(&path).unwrap();
        assert!(loaded);
        assert_eq!(config.sampling.interval_ms, 50);
    }

    #[test]
    fn test_load_or_default_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bma423io.toml");
        fs::write(&path, "[sampling\ninterval_ms = ").unwrap();

        match AppConfig::load_or_default(&path) {
            Err(crate::Error::ConfigParse(_)) => {}
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        match AppConfig::from_file("/nonexistent/bma423io.toml") {
            Err(crate::Error::Io(_)) => {}
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
