//! Layered coherent noise sampled in world space.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// One weighted noise layer.
///
/// `seed` offsets the sample coordinate, `frequency` scales it, and
/// `amplitude` weights the layer in the normalized blend.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub seed: f32,
    pub frequency: f32,
    pub amplitude: f32,
}

impl Wave {
    pub const fn new(seed: f32, frequency: f32, amplitude: f32) -> Self {
        Self { seed, frequency, amplitude }
    }
}

/// Normalized blend of [`Wave`] layers over a Perlin source.
///
/// Stateless once built: `sample` is a pure function of its inputs.
#[derive(Clone, Debug)]
pub struct NoiseField {
    perlin: Perlin,
    waves: Vec<Wave>,
    detail_scale: f32,
    normalization: f32,
}

impl NoiseField {
    /// Create a field from a Perlin seed, a horizontal detail scale
    /// (larger spreads the waves out) and the wave layers.
    pub fn new(noise_seed: u32, detail_scale: f32, waves: Vec<Wave>) -> Self {
        let normalization = waves.iter().map(|w| w.amplitude).sum();
        Self {
            perlin: Perlin::new(noise_seed),
            waves,
            detail_scale,
            normalization,
        }
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn detail_scale(&self) -> f32 {
        self.detail_scale
    }

    /// Single-octave coherent noise remapped from [-1, 1] to [0, 1].
    pub fn coherent(&self, x: f32, z: f32) -> f32 {
        let v = self.perlin.get([x as f64, z as f64]);
        (((v + 1.0) * 0.5) as f32).clamp(0.0, 1.0)
    }

    /// Blended noise at world position (x, z), in [0, 1].
    ///
    /// Returns 0.0 when the layers carry no amplitude.
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        if self.normalization <= 0.0 {
            return 0.0;
        }

        let sx = x / self.detail_scale;
        let sz = z / self.detail_scale;

        let sum: f32 = self
            .waves
            .iter()
            .map(|w| w.amplitude * self.coherent(sx * w.frequency + w.seed, sz * w.frequency + w.seed))
            .sum();

        (sum / self.normalization).clamp(0.0, 1.0)
    }
}
