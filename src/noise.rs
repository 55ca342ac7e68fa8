//! Coherent noise sources for mover motion.
//!
//! Each mover owns its own source so that agents sharing the same motion
//! formula still drift apart.

use noise::{NoiseFn, Perlin};

/// Deterministic, continuous 2-D noise in `[-1, 1]`
pub trait NoiseSource {
    fn sample(&self, a: f64, b: f64) -> f64;
}

/// Perlin noise generator for mover motion
pub struct PerlinNoise {
    perlin: Perlin,
}

impl PerlinNoise {
    /// Create new noise generator with seed
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }
}

impl NoiseSource for PerlinNoise {
    /// Sample 2D Perlin noise, clamped so the mover height bound holds exactly
    fn sample(&self, a: f64, b: f64) -> f64 {
        self.perlin.get([a, b]).clamp(-1.0, 1.0)
    }
}

/// Noise source that always returns the same value
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    fn sample(&self, _a: f64, _b: f64) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perlin_is_bounded() {
        let noise = PerlinNoise::new(7);
        for i in 0..2000 {
            let a = i as f64 * 0.037;
            let v = noise.sample(a, 2.5);
            assert!((-1.0..=1.0).contains(&v), "sample {} out of range at {}", v, a);
        }
    }

    #[test]
    fn test_perlin_is_deterministic() {
        let first = PerlinNoise::new(3);
        let second = PerlinNoise::new(3);
        for i in 0..100 {
            let a = i as f64 * 0.13;
            assert_eq!(first.sample(a, 2.5), second.sample(a, 2.5));
        }
    }

    #[test]
    fn test_perlin_is_continuous() {
        // Small steps in input must give small steps in output
        let noise = PerlinNoise::new(11);
        let mut prev = noise.sample(0.0, 2.5);
        for i in 1..1000 {
            let v = noise.sample(i as f64 * 0.001, 2.5);
            assert!((v - prev).abs() < 0.05);
            prev = v;
        }
    }

    #[test]
    fn test_distinct_seeds_diverge() {
        let a = PerlinNoise::new(1);
        let b = PerlinNoise::new(2);
        let differs = (0..100).any(|i| {
            let x = 0.3 + i as f64 * 0.11;
            (a.sample(x, 2.5) - b.sample(x, 2.5)).abs() > 1e-6
        });
        assert!(differs);
    }
}
