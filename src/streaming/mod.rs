//! Tile streaming around a moving observer

pub mod coord;
pub mod config;
pub mod record;
pub mod manager;

pub use coord::{GridCoord, TileKey};
pub use config::StreamingConfig;
pub use record::{PooledTile, TileRecord, TileState};
pub use manager::{SweepStats, TileManager};
