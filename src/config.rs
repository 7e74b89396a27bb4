//! World configuration loaded from JSON

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::scatter::ScatterConfig;
use crate::streaming::StreamingConfig;
use crate::terrain::TerrainSettings;

/// Everything needed to stand up a terrain tile cache.
///
/// Every section and field is optional in JSON; missing values take the
/// defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub streaming: StreamingConfig,
    pub terrain: TerrainSettings,
    pub scatter: ScatterConfig,
}

impl WorldConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded world config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.streaming.validate()?;
        self.terrain.validate()?;
        self.scatter.validate()?;

        // Unknown prefabs are skipped at placement time; flag them early
        let requested = self
            .scatter
            .on_create
            .iter()
            .map(|r| &r.prefab)
            .chain(self.scatter.on_move.iter().map(|s| &s.prefab));
        for prefab in requested {
            if !self.scatter.prefabs.iter().any(|p| &p.id == prefab) {
                log::warn!("Scatter request for '{}' has no prefab pool and will place nothing", prefab);
            }
        }
        Ok(())
    }
}
