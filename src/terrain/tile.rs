//! Pooled terrain tile: surface buffers, height table and attached scatter.

use std::collections::HashSet;
use std::rc::Rc;

use super::heightmap::{HeightBuilder, HeightTable};
use super::mesh::{TerrainVertex, TileTemplate};
use crate::core::types::Vec3;
use crate::math::Aabb;
use crate::pool::{PoolHandle, PrefabId};
use crate::scatter::{PlacementTarget, ScatterPools, ScatterSampler};
use crate::streaming::{GridCoord, PooledTile};

/// A tile resource recycled by the tile cache.
///
/// Builders and templates are shared between all tiles of a pool.
pub struct TerrainTile {
    template: Rc<TileTemplate>,
    builder: Rc<HeightBuilder>,
    sampler: Rc<ScatterSampler>,
    coord: GridCoord,
    origin: Vec3,
    active: bool,
    vertices: Vec<TerrainVertex>,
    height_table: Option<Rc<HeightTable>>,
    scatter: Vec<(PrefabId, PoolHandle)>,
}

impl TerrainTile {
    pub fn new(template: Rc<TileTemplate>, builder: Rc<HeightBuilder>, sampler: Rc<ScatterSampler>) -> Self {
        let vertices = template.flat_vertices();
        Self {
            template,
            builder,
            sampler,
            coord: GridCoord::default(),
            origin: Vec3::ZERO,
            active: false,
            vertices,
            height_table: None,
            scatter: Vec::new(),
        }
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Vertex buffer for the external renderer/collider.
    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        self.template.indices()
    }

    pub fn height_table(&self) -> Option<&HeightTable> {
        self.height_table.as_deref()
    }

    /// Scatter instances currently attached to this tile.
    pub fn scatter(&self) -> &[(PrefabId, PoolHandle)] {
        &self.scatter
    }

    /// World-space bounds of the flat tile footprint.
    pub fn world_bounds(&self) -> Aabb {
        self.template.bounds().translated(self.origin)
    }

    /// Set every vertex within `radius` grid steps of `(row, col)` to `height`.
    ///
    /// Only the render surface changes; the height table is fixed for the
    /// tile's activation.
    pub fn flatten_section(&mut self, row: usize, col: usize, radius: usize, height: f32) {
        let side = self.template.side_verts();
        let last = side - 1;
        let row_begin = row.saturating_sub(radius).min(last);
        let row_end = row.saturating_add(radius).min(last);
        let col_begin = col.saturating_sub(radius).min(last);
        let col_end = col.saturating_add(radius).min(last);

        for r in row_begin..=row_end {
            for c in col_begin..=col_end {
                self.vertices[r * side + c].position[1] = height;
            }
        }
    }
}

impl TerrainTile {
    /// Keep one entry per instance still attached here. Recycling pools
    /// re-issue handles, so an instance may have moved to another tile or
    /// been placed on this one more than once.
    fn prune_scatter(&mut self, pools: &ScatterPools) {
        let coord = self.coord;
        let mut seen = HashSet::with_capacity(self.scatter.len());
        self.scatter.retain(|(prefab, handle)| {
            let owned = pools
                .get(prefab, *handle)
                .is_some_and(|inst| inst.parent() == Some(coord));
            owned && seen.insert((prefab.clone(), *handle))
        });
    }
}

impl PooledTile for TerrainTile {
    fn activate(&mut self, coord: GridCoord) {
        self.coord = coord;
        self.origin = coord.world_origin(self.template.tile_size());
        self.active = true;
    }

    fn generate_terrain(&mut self) -> Rc<HeightTable> {
        let surface = self.builder.build(self.origin, &self.template);

        for ((vertex, height), color) in self.vertices.iter_mut().zip(&surface.heights).zip(&surface.colors) {
            vertex.position[1] = *height;
            vertex.color = *color;
        }

        let table = Rc::new(surface.table);
        self.height_table = Some(Rc::clone(&table));
        table
    }

    fn gen_objects(&mut self, prefab: &PrefabId, amount: usize, pools: &mut ScatterPools) -> usize {
        let Some(table) = self.height_table.as_deref() else {
            log::debug!("Tile {:?} has no terrain yet, skipping '{}'", self.coord, prefab);
            return 0;
        };

        let target = PlacementTarget {
            coord: self.coord,
            origin: self.origin,
            table,
            height_scale: self.builder.height_scale(),
            cell_scale: self.template.cell_scale(),
        };
        let placed = self.sampler.place(target, prefab, amount, pools);
        let count = placed.len();
        self.scatter.extend(placed.into_iter().map(|h| (prefab.clone(), h)));
        self.prune_scatter(pools);
        count
    }

    fn retire(&mut self, pools: &mut ScatterPools) {
        for (prefab, handle) in self.scatter.drain(..) {
            // A recycling pool may have re-issued the instance to another tile
            let owned = pools
                .get(&prefab, handle)
                .is_some_and(|inst| inst.parent() == Some(self.coord));
            if owned {
                if let Some(inst) = pools.get_mut(&prefab, handle) {
                    inst.detach();
                }
                pools.release(&prefab, handle);
            }
        }
        self.height_table = None;
        self.active = false;
    }
}
