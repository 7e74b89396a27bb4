//! Tile grid coordinates and live-map keys.

use crate::core::types::{Vec2, Vec3};
use crate::math::{decode_morton_2d, encode_morton_2d};

/// Tile index on the world grid. The tile's world origin is
/// `(x * tile_size.x, 0, z * tile_size.y)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub x: i32,
    pub z: i32,
}

impl GridCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Cell containing a world position (floor division, so negative
    /// positions land in negative cells).
    pub fn from_world_pos(pos: Vec3, tile_size: Vec2) -> Self {
        Self {
            x: (pos.x / tile_size.x).floor() as i32,
            z: (pos.z / tile_size.y).floor() as i32,
        }
    }

    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x.wrapping_add(dx), self.z.wrapping_add(dz))
    }

    /// World-space origin (minimum corner) of this tile.
    pub fn world_origin(self, tile_size: Vec2) -> Vec3 {
        Vec3::new(self.x as f32 * tile_size.x, 0.0, self.z as f32 * tile_size.y)
    }

    pub fn key(self) -> TileKey {
        TileKey(encode_morton_2d(self.x as u32, self.z as u32))
    }
}

/// Injective 64-bit key of a [`GridCoord`]: the Morton interleave of both
/// axes reinterpreted as unsigned, so every coordinate pair maps to a
/// distinct key and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey(u64);

impl TileKey {
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn coord(self) -> GridCoord {
        let (x, z) = decode_morton_2d(self.0);
        GridCoord::new(x as i32, z as i32)
    }
}

impl From<GridCoord> for TileKey {
    fn from(coord: GridCoord) -> Self {
        coord.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const SIZE: Vec2 = Vec2::new(25.0, 25.0);

    #[test]
    fn test_from_world_pos_floors() {
        assert_eq!(GridCoord::from_world_pos(Vec3::new(0.0, 5.0, 0.0), SIZE), GridCoord::new(0, 0));
        assert_eq!(GridCoord::from_world_pos(Vec3::new(24.9, 0.0, 25.0), SIZE), GridCoord::new(0, 1));
        assert_eq!(GridCoord::from_world_pos(Vec3::new(-0.1, 0.0, -25.0), SIZE), GridCoord::new(-1, -1));
        assert_eq!(GridCoord::from_world_pos(Vec3::new(-25.1, 0.0, 60.0), SIZE), GridCoord::new(-2, 2));
    }

    #[test]
    fn test_world_origin() {
        assert_eq!(GridCoord::new(-2, 1).world_origin(SIZE), Vec3::new(-50.0, 0.0, 25.0));
    }

    #[test]
    fn test_key_roundtrip_signed() {
        for coord in [
            GridCoord::new(0, 0),
            GridCoord::new(-1, 1),
            GridCoord::new(1, -1),
            GridCoord::new(i32::MIN, i32::MAX),
            GridCoord::new(i32::MAX, i32::MIN),
        ] {
            assert_eq!(coord.key().coord(), coord);
        }
    }

    #[test]
    fn test_keys_distinct_where_strings_and_sums_collide() {
        // sums and naive concatenations collide for these pairs
        let coords = [
            GridCoord::new(1, 2),
            GridCoord::new(2, 1),
            GridCoord::new(12, 3),
            GridCoord::new(1, 23),
            GridCoord::new(-1, 1),
            GridCoord::new(1, -1),
            GridCoord::new(0, 0),
        ];
        let keys: HashSet<_> = coords.iter().map(|c| c.key()).collect();
        assert_eq!(keys.len(), coords.len());
    }

    #[test]
    fn test_keys_unique_over_window() {
        let mut keys = HashSet::new();
        for x in -40..40 {
            for z in -40..40 {
                assert!(keys.insert(GridCoord::new(x, z).key()));
            }
        }
    }
}
