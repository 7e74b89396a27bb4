//! Scatter system configuration.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::pool::{PrefabId, PrefabPoolConfig, RecyclePolicy};

/// Whether the requested count bounds placements on a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementLimit {
    /// Only the decimation rule decides; the requested count is ignored.
    #[default]
    Decimation,
    /// Stop once `count` instances have been placed on the tile.
    CapToCount,
}

/// Acceptance rule for candidate grid cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementRules {
    /// Cells excluded on every side of the grid
    pub border: usize,
    /// Accept cell when `(row * side + col) % decimation == 0`
    pub decimation: usize,
    /// Exclusive lower bound on `height / height_scale`
    pub band_min: f32,
    /// Exclusive upper bound on `height / height_scale`
    pub band_max: f32,
    pub limit: PlacementLimit,
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            border: 2,
            decimation: 80,
            band_min: 0.2,
            band_max: 0.6,
            limit: PlacementLimit::Decimation,
        }
    }
}

/// Objects placed on every tile when it is created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterRequest {
    pub prefab: PrefabId,
    pub amount: usize,
}

/// Objects placed around the observer each time a refresh sweep runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterSweep {
    /// Half-width of the tile square, in tiles
    pub radius: i32,
    pub prefab: PrefabId,
    /// Inclusive lower bound of the per-tile count
    pub min: usize,
    /// Exclusive upper bound of the per-tile count
    pub max: usize,
}

/// Configuration for the scatter system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub prefabs: Vec<PrefabPoolConfig>,
    pub on_create: Vec<ScatterRequest>,
    pub on_move: Vec<ScatterSweep>,
    pub rules: PlacementRules,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            prefabs: vec![
                PrefabPoolConfig { id: "tree".into(), pool_size: 256, policy: RecyclePolicy::Exclusive },
                PrefabPoolConfig { id: "enemy".into(), pool_size: 64, policy: RecyclePolicy::Exclusive },
                PrefabPoolConfig { id: "enemy_v1".into(), pool_size: 64, policy: RecyclePolicy::Recycle },
            ],
            on_create: vec![
                ScatterRequest { prefab: "tree".into(), amount: 10 },
                ScatterRequest { prefab: "enemy".into(), amount: 1 },
            ],
            on_move: vec![ScatterSweep { radius: 1, prefab: "enemy_v1".into(), min: 0, max: 2 }],
            rules: PlacementRules::default(),
        }
    }
}

impl ScatterConfig {
    /// Configuration with no prefabs and no scatter requests.
    pub fn empty() -> Self {
        Self {
            prefabs: Vec::new(),
            on_create: Vec::new(),
            on_move: Vec::new(),
            rules: PlacementRules::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rules.decimation == 0 {
            return Err(Error::config("decimation must be at least 1"));
        }
        if !(self.rules.band_min < self.rules.band_max) {
            return Err(Error::config(format!(
                "placement band ({}, {}) is empty",
                self.rules.band_min, self.rules.band_max
            )));
        }
        for (i, cfg) in self.prefabs.iter().enumerate() {
            if self.prefabs[..i].iter().any(|other| other.id == cfg.id) {
                return Err(Error::config(format!("prefab '{}' listed twice", cfg.id)));
            }
        }
        for sweep in &self.on_move {
            if sweep.radius < 0 {
                return Err(Error::config(format!(
                    "scatter sweep radius for '{}' is negative",
                    sweep.prefab
                )));
            }
        }
        Ok(())
    }
}
