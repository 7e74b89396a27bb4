//! Height lookup table and the per-tile height/color build.

use std::ops::Index;

use super::curve::{Gradient, HeightCurve};
use super::mesh::TileTemplate;
use super::noise_field::NoiseField;
use super::settings::TerrainSettings;
use crate::core::types::Vec3;

/// Per-tile elevation, one entry per vertex, indexed `(row, col)` in
/// tile-local grid space (row = z index, col = x index).
#[derive(Clone, Debug, PartialEq)]
pub struct HeightTable {
    rows: usize,
    cols: usize,
    heights: Vec<f32>,
}

impl HeightTable {
    /// Build a table by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut heights = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                heights.push(f(row, col));
            }
        }
        Self { rows, cols, heights }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.heights[row * self.cols + col])
        } else {
            None
        }
    }

    /// Heights in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.heights
    }
}

impl Index<(usize, usize)> for HeightTable {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        assert!(row < self.rows && col < self.cols, "height table index ({}, {}) out of bounds", row, col);
        &self.heights[row * self.cols + col]
    }
}

/// Output of one tile build. Geometry resubmission is the caller's job.
#[derive(Clone, Debug)]
pub struct SurfaceData {
    /// Vertex heights in template vertex order
    pub heights: Vec<f32>,
    /// Vertex colors in template vertex order
    pub colors: Vec<[f32; 4]>,
    pub table: HeightTable,
}

/// Turns layered noise into vertex heights, colors and a height table.
#[derive(Clone, Debug)]
pub struct HeightBuilder {
    field: NoiseField,
    height_scale: f32,
    height_curve: HeightCurve,
    gradient: Gradient,
}

impl HeightBuilder {
    pub fn new(settings: &TerrainSettings) -> Self {
        Self {
            field: NoiseField::new(settings.noise_seed, settings.detail_scale, settings.waves.clone()),
            height_scale: settings.height_scale,
            height_curve: settings.height_curve.clone(),
            gradient: settings.gradient.clone(),
        }
    }

    pub fn field(&self) -> &NoiseField {
        &self.field
    }

    pub fn height_scale(&self) -> f32 {
        self.height_scale
    }

    /// World-space height at (x, z), identical to what a tile build writes
    /// for a vertex at that position.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.height_curve.evaluate(self.field.sample(x, z)) * self.height_scale
    }

    /// Build the surface of a tile whose local origin sits at `origin`.
    pub fn build(&self, origin: Vec3, template: &TileTemplate) -> SurfaceData {
        let side = template.side_verts();
        let cell_scale = template.cell_scale();
        let positions = template.positions();

        let mut heights = Vec::with_capacity(positions.len());
        let mut colors = Vec::with_capacity(positions.len());
        let mut table = vec![f32::NAN; side * side];

        for p in positions {
            let noise = self.field.sample(p.x + origin.x, p.z + origin.z);
            let height = self.height_curve.evaluate(noise) * self.height_scale;

            heights.push(height);
            colors.push(self.gradient.evaluate(noise));

            let col = (p.x / cell_scale).round() as usize;
            let row = (p.z / cell_scale).round() as usize;
            debug_assert!(table[row * side + col].is_nan(), "cell ({}, {}) written twice", row, col);
            table[row * side + col] = height;
        }

        SurfaceData {
            heights,
            colors,
            table: HeightTable { rows: side, cols: side, heights: table },
        }
    }
}
