//! Procedural terrain generation

pub mod noise_field;
pub use noise_field::{NoiseField, Wave};

pub mod curve;
pub use curve::{Gradient, HeightCurve, Lerp, Ramp};

pub mod mesh;
pub use mesh::{TerrainVertex, TileTemplate};

pub mod heightmap;
pub use heightmap::{HeightBuilder, HeightTable, SurfaceData};

pub mod settings;
pub use settings::TerrainSettings;

pub mod tile;
pub use tile::TerrainTile;
