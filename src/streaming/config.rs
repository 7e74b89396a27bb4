//! Tile streaming configuration.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Grid, radius and pool sizing for the tile cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Quads per tile side; the vertex grid is `side_cells + 1` square
    pub side_cells: u32,
    /// World units per quad
    pub cell_scale: f32,
    /// Half-width of the live tile square, in tiles
    pub view_radius: u32,
    /// Observer displacement, in tiles, that triggers a refresh sweep
    pub update_radius: u32,
    /// Tile pool size; `None` uses `(3 * view_radius)^2`
    pub pool_capacity: Option<usize>,
    /// Seed for the scatter-count RNG
    pub seed: u64,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            side_cells: 25,
            cell_scale: 4.0,
            view_radius: 2,
            update_radius: 1,
            pool_capacity: None,
            seed: 12345,
        }
    }
}

impl StreamingConfig {
    /// Tiles a sweep keeps live at once: `(2 * view_radius)^2`.
    pub fn required_tiles(&self) -> usize {
        let side = 2 * self.view_radius as usize;
        side * side
    }

    /// Configured pool size, defaulting to `(3 * view_radius)^2`.
    pub fn pool_capacity(&self) -> usize {
        self.pool_capacity.unwrap_or_else(|| {
            let side = 3 * self.view_radius as usize;
            side * side
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.side_cells == 0 {
            return Err(Error::config("side_cells must be at least 1"));
        }
        if !(self.cell_scale > 0.0) {
            return Err(Error::config(format!("cell_scale must be positive, got {}", self.cell_scale)));
        }
        if self.view_radius == 0 {
            return Err(Error::config("view_radius must be at least 1"));
        }
        if self.update_radius == 0 {
            return Err(Error::config("update_radius must be at least 1"));
        }
        let capacity = self.pool_capacity();
        let required = self.required_tiles();
        if capacity < required {
            return Err(Error::config(format!(
                "tile pool capacity {} is below the {} tiles view radius {} keeps live",
                capacity, required, self.view_radius
            )));
        }
        Ok(())
    }
}
