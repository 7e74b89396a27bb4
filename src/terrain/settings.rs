//! Terrain shaping parameters.

use serde::{Deserialize, Serialize};

use super::curve::{Gradient, HeightCurve};
use super::noise_field::Wave;
use crate::core::{Error, Result};

/// Parameters shared by every tile's height/color build.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Seed of the Perlin permutation table
    pub noise_seed: u32,
    /// Horizontal scale applied before the wave frequencies (larger = smoother)
    pub detail_scale: f32,
    /// Vertical scale (max height)
    pub height_scale: f32,
    /// Noise layers blended into the elevation field
    pub waves: Vec<Wave>,
    /// Response curve from normalized noise to height fraction
    pub height_curve: HeightCurve,
    /// Vertex color as a function of normalized noise
    pub gradient: Gradient,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            noise_seed: 0,
            detail_scale: 20.0,
            height_scale: 10.0,
            waves: vec![
                Wave::new(56.0, 0.5, 1.0),
                Wave::new(199.36, 1.0, 0.5),
            ],
            height_curve: HeightCurve::default(),
            gradient: Gradient::default(),
        }
    }
}

impl TerrainSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.detail_scale > 0.0) {
            return Err(Error::config(format!(
                "detail_scale must be positive, got {}",
                self.detail_scale
            )));
        }
        if !(self.height_scale > 0.0) {
            return Err(Error::config(format!(
                "height_scale must be positive, got {}",
                self.height_scale
            )));
        }
        if self.waves.iter().any(|w| w.amplitude < 0.0) {
            return Err(Error::config("wave amplitudes must not be negative"));
        }
        let total: f32 = self.waves.iter().map(|w| w.amplitude).sum();
        if !(total > 0.0) {
            return Err(Error::config("waves must carry a positive total amplitude"));
        }
        Ok(())
    }
}
