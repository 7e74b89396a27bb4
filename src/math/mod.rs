//! Mathematical utilities

pub mod aabb;
pub mod morton;

pub use aabb::Aabb;
pub use morton::{decode_morton_2d, encode_morton_2d};
