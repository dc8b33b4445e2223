//! Seedable noise source for the simulated sensor

use rand::prelude::*;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, StandardNormal, Uniform};

/// Noise generator with configurable seed for reproducibility
#[derive(Clone)]
pub struct NoiseGenerator {
    rng: SmallRng,
}

impl NoiseGenerator {
    /// Seed 0 draws from OS entropy, anything else is deterministic
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self { rng }
    }

    /// Zero-mean Gaussian sample
    #[inline]
    pub fn gaussian(&mut self, stddev: f32) -> f32 {
        if stddev == 0.0 {
            return 0.0;
        }
        let n: f32 = self.rng.sample(StandardNormal);
        n * stddev
    }

    /// Independent Gaussian sample per axis, offset by `bias`
    #[inline]
    pub fn gaussian3(&mut self, bias: [f32; 3], stddev: [f32; 3]) -> [f32; 3] {
        [
            bias[0] + self.gaussian(stddev[0]),
            bias[1] + self.gaussian(stddev[1]),
            bias[2] + self.gaussian(stddev[2]),
        ]
    }

    /// Returns true with given probability
    #[inline]
    pub fn chance(&mut self, probability: f32) -> bool {
        if probability <= 0.0 {
            return false;
        }
        Uniform::new(0.0f32, 1.0).sample(&mut self.rng) < probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_seed() {
        let mut noise1 = NoiseGenerator::new(42);
        let mut noise2 = NoiseGenerator::new(42);

        for _ in 0..100 {
            assert_eq!(
                noise1.gaussian3([0.0; 3], [1.0; 3]),
                noise2.gaussian3([0.0; 3], [1.0; 3])
            );
        }
    }

    #[test]
    fn test_zero_stddev_returns_bias() {
        let mut noise = NoiseGenerator::new(42);
        assert_eq!(noise.gaussian3([0.1, -0.2, 0.3], [0.0; 3]), [0.1, -0.2, 0.3]);
    }

    #[test]
    fn test_chance_probability() {
        let mut noise = NoiseGenerator::new(42);
        let trials = 10000;
        let count = (0..trials).filter(|_| noise.chance(0.3)).count();

        let ratio = count as f32 / trials as f32;
        assert!((ratio - 0.3).abs() < 0.05);
        assert!(!noise.chance(0.0));
    }
}
