//! # Noise System
//!
//! Deterministic, seeded heightmap noise. Multi-octave Perlin gradient noise is
//! summed, normalised by the total octave amplitude and mapped into `[0, 1]`.

use noise::{NoiseFn, Perlin};

/// Scaling factor applied to world coordinates when sampling the heightmap.
pub const NOISE_SCALE: f64 = 0.01;
/// Octaves summed per heightmap sample.
pub const NOISE_OCTAVES: u32 = 4;
/// Amplitude falloff between octaves.
pub const NOISE_PERSISTENCE: f64 = 0.5;
/// Frequency growth between octaves.
pub const NOISE_LACUNARITY: f64 = 2.0;
/// Terrain height in blocks for a normalised noise value of 1.0.
pub const HEIGHT_AMPLITUDE: f64 = 90.0;

/// Seeded gradient noise used for terrain heights.
#[derive(Clone, Debug)]
pub struct NoiseSystem {
    seed: u32,
    perlin: Perlin,
}

impl NoiseSystem {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            perlin: Perlin::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Multi-octave noise at `(x, z)`, normalised into `[0, 1]`.
    pub fn octave_noise_01(&self, x: f64, z: f64, octaves: u32) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves {
            total += self.perlin.get([x * frequency, z * frequency]) * amplitude;
            max_amplitude += amplitude;
            amplitude *= NOISE_PERSISTENCE;
            frequency *= NOISE_LACUNARITY;
        }

        if max_amplitude == 0.0 {
            return 0.5;
        }

        ((total / max_amplitude + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Surface height `H` of the world column at `(gx, gz)`.
    pub fn surface_height(&self, gx: i32, gz: i32) -> i32 {
        let n = self.octave_noise_01(gx as f64 * NOISE_SCALE, gz as f64 * NOISE_SCALE, NOISE_OCTAVES);
        (n * HEIGHT_AMPLITUDE).floor() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_heights() {
        let a = NoiseSystem::new(7);
        let b = NoiseSystem::new(7);
        for gx in (-300..300).step_by(37) {
            for gz in (-300..300).step_by(41) {
                assert_eq!(a.surface_height(gx, gz), b.surface_height(gx, gz));
            }
        }
    }

    #[test]
    fn heights_stay_in_amplitude_range() {
        let noise = NoiseSystem::new(0);
        for gx in (-1000..1000).step_by(13) {
            let h = noise.surface_height(gx, gx / 2);
            assert!((0..=HEIGHT_AMPLITUDE as i32).contains(&h), "height {} out of range", h);
        }
    }

    #[test]
    fn zero_octaves_is_midpoint() {
        let noise = NoiseSystem::new(3);
        assert_eq!(noise.octave_noise_01(1.5, 2.5, 0), 0.5);
    }
}
