//! Deterministic scatter placement over a tile's height table.

use super::config::{PlacementLimit, PlacementRules};
use super::ScatterInstance;
use crate::core::types::Vec3;
use crate::pool::{PoolError, PoolHandle, PrefabId, PrefabPools};
use crate::streaming::GridCoord;
use crate::terrain::HeightTable;

/// Everything the sampler needs to know about one tile.
#[derive(Clone, Copy, Debug)]
pub struct PlacementTarget<'a> {
    pub coord: GridCoord,
    pub origin: Vec3,
    pub table: &'a HeightTable,
    pub height_scale: f32,
    pub cell_scale: f32,
}

/// Walks the interior of a height table and places pooled instances on
/// cells in the mid-elevation band that survive decimation.
#[derive(Clone, Debug, Default)]
pub struct ScatterSampler {
    rules: PlacementRules,
}

impl ScatterSampler {
    pub fn new(rules: PlacementRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &PlacementRules {
        &self.rules
    }

    /// Acceptance test for one cell; `index` is `row * side + col`.
    /// A decimation of 0 accepts nothing.
    pub fn accepts(&self, height: f32, height_scale: f32, index: usize) -> bool {
        let ratio = height / height_scale;
        ratio > self.rules.band_min
            && ratio < self.rules.band_max
            && index.checked_rem(self.rules.decimation) == Some(0)
    }

    /// Accepted `(row, col)` cells in row-major order.
    pub fn candidates(&self, table: &HeightTable, height_scale: f32) -> Vec<(usize, usize)> {
        let side = table.cols();
        let border = self.rules.border;
        let mut cells = Vec::new();

        for row in border..table.rows().saturating_sub(border) {
            for col in border..side.saturating_sub(border) {
                if self.accepts(table[(row, col)], height_scale, row * side + col) {
                    cells.push((row, col));
                }
            }
        }
        cells
    }

    /// Place up to the accepted cells' worth of `prefab` instances on the
    /// target tile. An unregistered prefab places nothing; an exhausted pool
    /// stops placement early.
    pub fn place(
        &self,
        target: PlacementTarget<'_>,
        prefab: &PrefabId,
        count: usize,
        pools: &mut PrefabPools<ScatterInstance>,
    ) -> Vec<PoolHandle> {
        if !pools.contains(prefab) {
            log::debug!("No pool for prefab '{}', skipping placement", prefab);
            return Vec::new();
        }

        let mut placed = Vec::new();
        for (row, col) in self.candidates(target.table, target.height_scale) {
            if self.rules.limit == PlacementLimit::CapToCount && placed.len() >= count {
                break;
            }

            let handle = match pools.acquire(prefab) {
                Ok(h) => h,
                Err(PoolError::Exhausted(id)) => {
                    log::debug!("Pool '{}' exhausted after {} placements on {:?}", id, placed.len(), target.coord);
                    break;
                }
                Err(e @ PoolError::UnknownPrefab(_)) => {
                    log::debug!("{}", e);
                    break;
                }
            };

            let local = Vec3::new(
                col as f32 * target.cell_scale,
                target.table[(row, col)],
                row as f32 * target.cell_scale,
            );
            if let Some(instance) = pools.get_mut(prefab, handle) {
                instance.place(local + target.origin, target.coord);
            }
            placed.push(handle);
        }

        log::trace!("Placed {} '{}' on {:?}", placed.len(), prefab, target.coord);
        placed
    }
}
