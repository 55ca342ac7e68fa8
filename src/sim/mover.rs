//! Single oscillating agent driven by a sinusoid plus coherent noise.

use glam::DVec3;

use crate::noise::NoiseSource;
use crate::params::MoverParams;

/// One agent of the grid
///
/// `x` and `z` are fixed at creation. `y` is recomputed every tick from the
/// accumulated phase and one noise sample, never integrated.
pub struct Mover<N> {
    position: DVec3,
    phase: DVec3,
    velocity: DVec3,
    amplitude: DVec3,
    noise_scale: f64,
    noise: N,
}

impl<N: NoiseSource> Mover<N> {
    /// Create a mover resting at height 0 with a starting phase offset
    pub fn new(x: f64, z: f64, phase_offset: f64, params: &MoverParams, noise: N) -> Self {
        Self {
            position: DVec3::new(x, 0.0, z),
            phase: DVec3::new(0.0, phase_offset, 0.0),
            velocity: params.velocity,
            amplitude: params.amplitude,
            noise_scale: params.noise_scale,
            noise,
        }
    }

    /// Advance one tick
    ///
    /// The phase is accumulated twice per tick: the noise is sampled between
    /// the two steps and the sinusoid is read after the second.
    pub fn update(&mut self) {
        self.phase += self.velocity;
        let noise_val = self.noise.sample(self.phase.y, self.amplitude.y) * self.noise_scale;
        self.phase += self.velocity;
        self.position.y = self.phase.y.sin() * self.amplitude.y + noise_val;
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn phase(&self) -> DVec3 {
        self.phase
    }

    pub fn velocity(&self) -> DVec3 {
        self.velocity
    }

    pub fn amplitude(&self) -> DVec3 {
        self.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{ConstantNoise, PerlinNoise};

    #[test]
    fn test_single_update_with_silent_noise() {
        let params = MoverParams::default();
        let mut mover = Mover::new(0.0, 0.0, 0.0, &params, ConstantNoise(0.0));

        mover.update();

        assert!((mover.phase().y - 0.02).abs() < 1e-12);
        let expected = 0.02f64.sin() * 2.5;
        assert!((mover.position().y - expected).abs() < 1e-12);
        assert!((mover.position().y - 0.04999).abs() < 1e-4);
    }

    #[test]
    fn test_phase_accumulates_twice_per_tick() {
        let params = MoverParams::default();
        let mut mover = Mover::new(0.0, 0.0, 1.0, &params, ConstantNoise(0.0));

        for _ in 0..10 {
            mover.update();
        }

        let expected = DVec3::new(0.0, 1.0, 0.0) + params.velocity * 20.0;
        assert!((mover.phase() - expected).length() < 1e-9);
    }

    #[test]
    fn test_noise_offsets_height() {
        let params = MoverParams::default();
        let mut quiet = Mover::new(0.0, 0.0, 0.0, &params, ConstantNoise(0.0));
        let mut loud = Mover::new(0.0, 0.0, 0.0, &params, ConstantNoise(1.0));

        quiet.update();
        loud.update();

        assert!((loud.position().y - quiet.position().y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_x_and_z_never_change() {
        let params = MoverParams::default();
        let mut mover = Mover::new(-3.0, 7.0, 0.75, &params, PerlinNoise::new(5));

        for _ in 0..5000 {
            mover.update();
            assert_eq!(mover.position().x, -3.0);
            assert_eq!(mover.position().z, 7.0);
        }
    }

    #[test]
    fn test_height_is_finite_and_bounded() {
        let params = MoverParams::default();
        let bound = params.amplitude.y + 5.01;

        for seed in 0..8 {
            let mut mover = Mover::new(0.0, 0.0, seed as f64 * 0.25, &params, PerlinNoise::new(seed));
            for _ in 0..3000 {
                mover.update();
                let y = mover.position().y;
                assert!(y.is_finite());
                assert!(y >= -bound && y <= bound, "height {} escaped bound {}", y, bound);
            }
        }
    }

    #[test]
    fn test_extreme_noise_respects_bound() {
        let params = MoverParams::default();
        let mut mover = Mover::new(0.0, 0.0, 0.0, &params, ConstantNoise(-1.0));

        for _ in 0..1000 {
            mover.update();
            assert!(mover.position().y >= -params.height_bound());
        }
    }
}
