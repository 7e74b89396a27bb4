//! Tileworld - streamed procedural terrain tiles with pooled scatter objects

pub mod core;
pub mod math;
pub mod pool;
pub mod terrain;
pub mod scatter;
pub mod streaming;
pub mod config;

pub use config::WorldConfig;
pub use crate::core::{Error, Result};
pub use streaming::{GridCoord, SweepStats, TileManager};
