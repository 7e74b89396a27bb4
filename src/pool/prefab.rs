//! Pool-of-pools keyed by prefab identity.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::resource::{PoolHandle, RecyclePolicy, ResourcePool};
use crate::core::{Error, Result};

/// Identity of a scatter-object kind ("tree", "enemy", ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefabId(String);

impl PrefabId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PrefabId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for PrefabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static pool sizing for one prefab.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrefabPoolConfig {
    pub id: PrefabId,
    pub pool_size: usize,
    #[serde(default)]
    pub policy: RecyclePolicy,
}

/// Recoverable acquire failures. Callers treat both as "nothing to place".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("no pool registered for prefab '{0}'")]
    UnknownPrefab(PrefabId),

    #[error("pool for prefab '{0}' is exhausted")]
    Exhausted(PrefabId),
}

/// One [`ResourcePool`] per registered prefab.
pub struct PrefabPools<T> {
    pools: HashMap<PrefabId, ResourcePool<T>>,
}

impl<T> PrefabPools<T> {
    pub fn new() -> Self {
        Self { pools: HashMap::new() }
    }

    /// Build every pool in `configs`, creating instances with `factory`.
    pub fn from_configs(
        configs: &[PrefabPoolConfig],
        mut factory: impl FnMut(&PrefabId) -> T,
    ) -> Result<Self> {
        let mut pools = Self::new();
        for cfg in configs {
            pools.register(cfg.id.clone(), cfg.pool_size, cfg.policy, || factory(&cfg.id))?;
        }
        Ok(pools)
    }

    /// Pre-allocate `capacity` instances for `id`. Registering the same id
    /// twice is a configuration error.
    pub fn register(
        &mut self,
        id: PrefabId,
        capacity: usize,
        policy: RecyclePolicy,
        mut factory: impl FnMut() -> T,
    ) -> Result<()> {
        if self.pools.contains_key(&id) {
            return Err(Error::config(format!("prefab '{}' registered twice", id)));
        }
        log::info!("Created prefab pool '{}': {} instances ({:?})", id, capacity, policy);
        self.pools.insert(id, ResourcePool::new(capacity, policy, |_| factory()));
        Ok(())
    }

    pub fn contains(&self, id: &PrefabId) -> bool {
        self.pools.contains_key(id)
    }

    pub fn acquire(&mut self, id: &PrefabId) -> std::result::Result<PoolHandle, PoolError> {
        let pool = self
            .pools
            .get_mut(id)
            .ok_or_else(|| PoolError::UnknownPrefab(id.clone()))?;
        pool.acquire().ok_or_else(|| PoolError::Exhausted(id.clone()))
    }

    pub fn release(&mut self, id: &PrefabId, handle: PoolHandle) -> bool {
        self.pools.get_mut(id).is_some_and(|p| p.release(handle))
    }

    pub fn get(&self, id: &PrefabId, handle: PoolHandle) -> Option<&T> {
        self.pools.get(id)?.get(handle)
    }

    pub fn get_mut(&mut self, id: &PrefabId, handle: PoolHandle) -> Option<&mut T> {
        self.pools.get_mut(id)?.get_mut(handle)
    }

    pub fn pool(&self, id: &PrefabId) -> Option<&ResourcePool<T>> {
        self.pools.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &PrefabId> {
        self.pools.keys()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl<T> Default for PrefabPools<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pools() -> PrefabPools<u32> {
        PrefabPools::from_configs(
            &[
                PrefabPoolConfig { id: "tree".into(), pool_size: 2, policy: RecyclePolicy::Exclusive },
                PrefabPoolConfig { id: "enemy".into(), pool_size: 1, policy: RecyclePolicy::Recycle },
            ],
            |_| 0,
        )
        .unwrap()
    }

    #[test]
    fn test_unknown_prefab() {
        let mut p = pools();
        let rock = PrefabId::from("rock");
        assert!(!p.contains(&rock));
        assert_eq!(p.acquire(&rock), Err(PoolError::UnknownPrefab(rock)));
    }

    #[test]
    fn test_exhaustion_is_recoverable() {
        let mut p = pools();
        let tree = PrefabId::from("tree");
        let h = p.acquire(&tree).unwrap();
        p.acquire(&tree).unwrap();
        assert_eq!(p.acquire(&tree), Err(PoolError::Exhausted(tree.clone())));

        assert!(p.release(&tree, h));
        assert_eq!(p.acquire(&tree), Ok(h));
    }

    #[test]
    fn test_recycle_never_exhausts() {
        let mut p = pools();
        let enemy = PrefabId::from("enemy");
        for _ in 0..10 {
            assert!(p.acquire(&enemy).is_ok());
        }
        assert_eq!(p.pool(&enemy).unwrap().in_use_count(), 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut p = pools();
        let err = p.register("tree".into(), 4, RecyclePolicy::Exclusive, || 0);
        assert!(err.is_err());
        assert_eq!(p.pool(&"tree".into()).unwrap().capacity(), 2);
    }

    #[test]
    fn test_instances_are_mutable() {
        let mut p = pools();
        let tree = PrefabId::from("tree");
        let h = p.acquire(&tree).unwrap();
        *p.get_mut(&tree, h).unwrap() = 42;
        assert_eq!(p.get(&tree, h), Some(&42));
    }

    #[test]
    fn test_prefab_id_serde_transparent() {
        let id: PrefabId = serde_json::from_str("\"tree\"").unwrap();
        assert_eq!(id.as_str(), "tree");
    }
}
