//! Fixed-capacity resource pools.
//!
//! [`ResourcePool`] recycles pre-warmed instances of one kind; [`PrefabPools`]
//! keeps one such pool per scatter prefab.

pub mod resource;
pub mod prefab;

pub use resource::{PoolHandle, RecyclePolicy, ResourcePool};
pub use prefab::{PoolError, PrefabId, PrefabPoolConfig, PrefabPools};
