//! Live tile bookkeeping and the contract pooled tiles implement.

use std::rc::Rc;

use super::coord::GridCoord;
use crate::pool::{PoolHandle, PrefabId};
use crate::scatter::ScatterPools;
use crate::terrain::HeightTable;

/// A tile resource the cache manager can recycle.
///
/// The manager only talks to tiles through this trait: it positions a tile,
/// asks it for its height table and scatter objects, and retires it.
pub trait PooledTile {
    /// Move the tile to `coord` and make it active.
    fn activate(&mut self, coord: GridCoord);

    /// Regenerate the surface for the current position and return its height
    /// table. Called once per activation.
    fn generate_terrain(&mut self) -> Rc<HeightTable>;

    /// Place up to `amount` instances of `prefab` on the tile; returns how
    /// many were placed.
    fn gen_objects(&mut self, prefab: &PrefabId, amount: usize, pools: &mut ScatterPools) -> usize;

    /// Release everything the tile holds and deactivate it.
    fn retire(&mut self, pools: &mut ScatterPools);
}

/// Observable lifecycle state of a grid cell. Retirement happens inside a
/// sweep and is never observed between calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileState {
    Absent,
    Live,
}

/// One live tile.
#[derive(Debug, Clone)]
pub struct TileRecord {
    handle: PoolHandle,
    generation: u64,
    height_table: Rc<HeightTable>,
}

impl TileRecord {
    pub fn new(handle: PoolHandle, generation: u64, height_table: Rc<HeightTable>) -> Self {
        Self { handle, generation, height_table }
    }

    pub fn handle(&self) -> PoolHandle {
        self.handle
    }

    /// Sweep generation that last touched this tile.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn height_table(&self) -> &Rc<HeightTable> {
        &self.height_table
    }

    pub(crate) fn touch(&mut self, generation: u64) {
        self.generation = generation;
    }
}
