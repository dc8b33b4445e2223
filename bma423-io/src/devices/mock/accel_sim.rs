//! Accelerometer signal model for the simulated device
//!
//! Produces 12-bit counts for a static gravity vector plus per-axis bias
//! and Gaussian noise. Averaging settings shrink the noise by √N, the
//! same way the on-chip averaging filter does.

use super::config::SimulationConfig;
use super::noise::NoiseGenerator;
use crate::settings::{AccRange, OversampleRate, PerformanceMode};

/// Accelerometer simulator
pub struct AccelSimulator {
    gravity: [f32; 3],
    bias: [f32; 3],
    stddev: [f32; 3],
    noise: NoiseGenerator,
}

impl AccelSimulator {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            gravity: config.gravity,
            bias: config.noise.bias,
            stddev: config.noise.stddev,
            noise: NoiseGenerator::new(config.random_seed),
        }
    }

    pub fn set_gravity(&mut self, gravity: [f32; 3]) {
        self.gravity = gravity;
    }

    /// Access to the shared noise source (bus fault injection uses it too)
    pub fn noise(&mut self) -> &mut NoiseGenerator {
        &mut self.noise
    }

    /// Generate one reading in raw counts for the active settings
    pub fn generate(
        &mut self,
        range: AccRange,
        osr: OversampleRate,
        mode: PerformanceMode,
    ) -> [i16; 3] {
        let attenuation = match mode {
            PerformanceMode::Averaging => (osr.averaged_samples() as f32).sqrt(),
            PerformanceMode::Continuous => 1.0,
        };
        let stddev = self.stddev.map(|s| s / attenuation);
        let noise = self.noise.gaussian3(self.bias, stddev);
        let scale = range.lsb_per_g();

        [
            to_counts((self.gravity[0] + noise[0]) * scale),
            to_counts((self.gravity[1] + noise[1]) * scale),
            to_counts((self.gravity[2] + noise[2]) * scale),
        ]
    }
}

/// Round and saturate to the 12-bit output range
#[inline]
fn to_counts(value: f32) -> i16 {
    value.round().clamp(-2048.0, 2047.0) as i16
}
