//! Procedural scatter objects (trees, creatures) on terrain tiles.
//!
//! Placement is driven by each tile's height table: cells in a mid-elevation
//! band that survive a fixed decimation rule receive an instance drawn from
//! the prefab's pool.

pub mod config;
pub mod sampler;

pub use config::{PlacementLimit, PlacementRules, ScatterConfig, ScatterRequest, ScatterSweep};
pub use sampler::{PlacementTarget, ScatterSampler};

use crate::core::types::Vec3;
use crate::pool::{PrefabId, PrefabPools};
use crate::streaming::GridCoord;

/// Per-prefab pools of scatter instances.
pub type ScatterPools = PrefabPools<ScatterInstance>;

/// A pooled scatter object. Whether it is active is tracked by its pool.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterInstance {
    prefab: PrefabId,
    position: Vec3,
    parent: Option<GridCoord>,
}

impl ScatterInstance {
    pub fn new(prefab: PrefabId) -> Self {
        Self {
            prefab,
            position: Vec3::ZERO,
            parent: None,
        }
    }

    pub fn prefab(&self) -> &PrefabId {
        &self.prefab
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Tile the instance is attached to.
    pub fn parent(&self) -> Option<GridCoord> {
        self.parent
    }

    /// Move the instance and attach it under `parent`.
    pub fn place(&mut self, position: Vec3, parent: GridCoord) {
        self.position = position;
        self.parent = Some(parent);
    }

    pub fn detach(&mut self) {
        self.parent = None;
    }
}
