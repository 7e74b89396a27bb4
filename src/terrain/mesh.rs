//! Tile-shape template: the flat vertex grid every tile starts from.

use bytemuck::{Pod, Zeroable};

use crate::core::types::{Vec2, Vec3};
use crate::math::Aabb;

/// Vertex handed to the external renderer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Square grid of `side_cells × side_cells` quads, two triangles each.
///
/// Vertices are laid out row-major with row = local z index and
/// column = local x index, at `(col * cell_scale, 0, row * cell_scale)`.
#[derive(Clone, Debug)]
pub struct TileTemplate {
    side_cells: u32,
    cell_scale: f32,
    positions: Vec<Vec3>,
    indices: Vec<u32>,
    bounds: Aabb,
}

impl TileTemplate {
    pub fn new(side_cells: u32, cell_scale: f32) -> Self {
        let side_verts = side_cells + 1;

        let mut positions = Vec::with_capacity((side_verts * side_verts) as usize);
        for z in 0..side_verts {
            for x in 0..side_verts {
                positions.push(Vec3::new(x as f32 * cell_scale, 0.0, z as f32 * cell_scale));
            }
        }

        let mut indices = Vec::with_capacity((side_cells * side_cells * 6) as usize);
        for z in 0..side_cells {
            for x in 0..side_cells {
                let vi = z * side_verts + x;
                indices.extend_from_slice(&[
                    vi,
                    vi + side_verts,
                    vi + 1,
                    vi + 1,
                    vi + side_verts,
                    vi + side_verts + 1,
                ]);
            }
        }

        let bounds = Aabb::from_points(positions.iter().copied()).unwrap_or_default();

        Self {
            side_cells,
            cell_scale,
            positions,
            indices,
            bounds,
        }
    }

    pub fn side_cells(&self) -> u32 {
        self.side_cells
    }

    /// Vertices per side (rows and columns of the height table).
    pub fn side_verts(&self) -> usize {
        self.side_cells as usize + 1
    }

    pub fn cell_scale(&self) -> f32 {
        self.cell_scale
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Tile footprint in world units (x, z), taken from the template bounds.
    pub fn tile_size(&self) -> Vec2 {
        let size = self.bounds.size();
        Vec2::new(size.x, size.z)
    }

    /// Fresh flat vertex buffer for a newly pooled tile.
    pub fn flat_vertices(&self) -> Vec<TerrainVertex> {
        self.positions
            .iter()
            .map(|p| TerrainVertex {
                position: p.to_array(),
                color: [1.0; 4],
            })
            .collect()
    }
}
