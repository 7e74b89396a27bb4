//! Fixed-capacity recycling pool.
//!
//! Every instance is created up front; the pool never grows or shrinks.
//! Instances are handed out in FIFO order of their return, so the next
//! acquire always yields the least-recently-returned instance.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// How an acquired instance goes back into circulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecyclePolicy {
    /// Acquire removes the instance from the queue until it is released.
    /// An empty queue reports exhaustion.
    #[default]
    Exclusive,
    /// Acquire re-enqueues the instance at the tail immediately, so a
    /// still-active instance can be handed out again once the queue wraps.
    Recycle,
}

/// Handle to an instance owned by a [`ResourcePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolHandle(pub(crate) usize);

impl PoolHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

struct PoolSlot<T> {
    item: T,
    in_use: bool,
}

/// Pre-warmed pool of `T` instances.
pub struct ResourcePool<T> {
    slots: Vec<PoolSlot<T>>,
    available: VecDeque<usize>,
    policy: RecyclePolicy,
}

impl<T> ResourcePool<T> {
    /// Pre-allocate `capacity` inactive instances built by `factory`.
    pub fn new(capacity: usize, policy: RecyclePolicy, mut factory: impl FnMut(usize) -> T) -> Self {
        let slots = (0..capacity)
            .map(|i| PoolSlot {
                item: factory(i),
                in_use: false,
            })
            .collect();

        Self {
            slots,
            available: (0..capacity).collect(),
            policy,
        }
    }

    /// Take the head of the queue and mark it active.
    ///
    /// Returns `None` when no instance is available (exhaustion under
    /// [`RecyclePolicy::Exclusive`], or an empty pool).
    pub fn acquire(&mut self) -> Option<PoolHandle> {
        let idx = self.available.pop_front()?;
        if self.policy == RecyclePolicy::Recycle {
            self.available.push_back(idx);
        }
        self.slots[idx].in_use = true;
        Some(PoolHandle(idx))
    }

    /// Deactivate an instance. Returns `false` for an unknown or already
    /// inactive handle.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.0) else {
            return false;
        };
        if !slot.in_use {
            return false;
        }
        slot.in_use = false;
        if self.policy == RecyclePolicy::Exclusive {
            self.available.push_back(handle.0);
        }
        true
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots.get(handle.0).map(|s| &s.item)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots.get_mut(handle.0).map(|s| &mut s.item)
    }

    pub fn is_in_use(&self, handle: PoolHandle) -> bool {
        self.slots.get(handle.0).is_some_and(|s| s.in_use)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn policy(&self) -> RecyclePolicy {
        self.policy
    }

    /// Number of active instances. Never exceeds `capacity()`.
    pub fn in_use_count(&self) -> usize {
        self.slots.iter().filter(|s| s.in_use).count()
    }

    /// Active instances with their handles.
    pub fn iter_in_use(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.in_use)
            .map(|(i, s)| (PoolHandle(i), &s.item))
    }
}
