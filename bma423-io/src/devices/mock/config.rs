//! Simulated device configuration
//!
//! Every parameter has a default matching a BMA423 lying flat on a desk,
//! so an empty `[device.simulation]` table is a valid configuration.
//!
//! ```toml
//! [device.simulation]
//! random_seed = 42            # 0 = random each run
//! gravity = [0.0, 0.0, 1.0]   # g, sensor frame
//! temperature_c = 25.0
//! nack_rate = 0.0             # probability a bus transfer is not acknowledged
//!
//! [device.simulation.noise]
//! stddev = [0.004, 0.004, 0.006]
//! bias = [0.0, 0.0, 0.0]
//! ```

use serde::{Deserialize, Serialize};

/// Per-axis Gaussian noise, in g
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Noise3DConfig {
    /// Standard deviation per axis [x, y, z]
    #[serde(default = "default_noise_stddev")]
    pub stddev: [f32; 3],

    /// Constant bias per axis [x, y, z]
    #[serde(default)]
    pub bias: [f32; 3],
}

// Datasheet noise density ~140 µg/√Hz at 100 Hz bandwidth
fn default_noise_stddev() -> [f32; 3] {
    [0.004, 0.004, 0.006]
}

impl Default for Noise3DConfig {
    fn default() -> Self {
        Self {
            stddev: default_noise_stddev(),
            bias: [0.0, 0.0, 0.0],
        }
    }
}

/// Top-level simulation parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Seed for the noise generator, 0 = entropy
    #[serde(default)]
    pub random_seed: u64,

    /// Static acceleration seen by the sensor (g)
    #[serde(default = "default_gravity")]
    pub gravity: [f32; 3],

    /// Die temperature (°C)
    #[serde(default = "default_temperature")]
    pub temperature_c: f32,

    /// Probability of a NACK on any transfer (0.0-1.0)
    #[serde(default)]
    pub nack_rate: f32,

    #[serde(default)]
    pub noise: Noise3DConfig,
}

fn default_gravity() -> [f32; 3] {
    [0.0, 0.0, 1.0]
}
fn default_temperature() -> f32 {
    25.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            random_seed: 0,
            gravity: default_gravity(),
            temperature_c: default_temperature(),
            nack_rate: 0.0,
            noise: Noise3DConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_uses_defaults() {
        let config: SimulationConfig = toml::from_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.gravity, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_partial_noise_table() {
        let config: SimulationConfig = toml::from_str(
            r#"
random_seed = 7
gravity = [1.0, 0.0, 0.0]

[noise]
bias = [0.01, 0.0, -0.02]
"#,
        )
        .unwrap();
        assert_eq!(config.random_seed, 7);
        assert_eq!(config.gravity, [1.0, 0.0, 0.0]);
        assert_eq!(config.noise.bias, [0.01, 0.0, -0.02]);
        assert_eq!(config.noise.stddev, default_noise_stddev());
    }
}
