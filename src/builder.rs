//! Unified cache builder for both eviction policies.
//!
//! Lets callers pick a policy at runtime (from configuration, a CLI flag, a
//! bench parameter) and drive the result through one concrete type.
//!
//! ## Example
//!
//! ```rust
//! use midcache::builder::{CacheBuilder, CachePolicy};
//!
//! let mut cache = CacheBuilder::new(100).build::<u64, String>(CachePolicy::midpoint());
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```

use std::hash::Hash;

use crate::error::ConfigError;
use crate::policy::lru::LruCache;
use crate::policy::midpoint::MidpointCache;

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CachePolicy {
    /// Plain least-recently-used eviction.
    Lru,
    /// Midpoint insertion with the given share of capacity for the old region.
    Midpoint { old_ratio: f64 },
}

impl CachePolicy {
    /// Midpoint insertion with the default old-region ratio.
    pub fn midpoint() -> Self {
        Self::Midpoint {
            old_ratio: MidpointCache::<(), ()>::DEFAULT_OLD_RATIO,
        }
    }
}

/// Unified cache wrapper that provides a consistent API regardless of policy.
pub struct Cache<K, V>
where
    K: Clone + Eq + Hash,
{
    inner: CacheInner<K, V>,
}

enum CacheInner<K, V>
where
    K: Clone + Eq + Hash,
{
    Lru(LruCache<K, V>),
    Midpoint(MidpointCache<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Insert a key-value pair. Returns the previous value if the key existed.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.insert(key, value),
            CacheInner::Midpoint(mid) => mid.insert(key, value),
        }
    }

    /// Get a reference to a value by key, applying the policy's hit bookkeeping.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.get(key),
            CacheInner::Midpoint(mid) => mid.get(key),
        }
    }

    /// Read a value without touching eviction order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.peek(key),
            CacheInner::Midpoint(mid) => mid.peek(key),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(lru) => lru.contains(key),
            CacheInner::Midpoint(mid) => mid.contains(key),
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.remove(key),
            CacheInner::Midpoint(mid) => mid.remove(key),
        }
    }

    pub fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.len(),
            CacheInner::Midpoint(mid) => mid.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.capacity(),
            CacheInner::Midpoint(mid) => mid.capacity(),
        }
    }

    pub fn clear(&mut self) {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.clear(),
            CacheInner::Midpoint(mid) => mid.clear(),
        }
    }

    /// The policy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        match &self.inner {
            CacheInner::Lru(_) => CachePolicy::Lru,
            CacheInner::Midpoint(mid) => CachePolicy::Midpoint {
                old_ratio: mid.old_ratio(),
            },
        }
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Build a cache with the specified policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a zero capacity or an out-of-range ratio.
    pub fn try_build<K, V>(self, policy: CachePolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Clone + Eq + Hash,
    {
        let inner = match policy {
            CachePolicy::Lru => CacheInner::Lru(LruCache::try_new(self.capacity)?),
            CachePolicy::Midpoint { old_ratio } => {
                CacheInner::Midpoint(MidpointCache::try_new(self.capacity, old_ratio)?)
            },
        };
        Ok(Cache { inner })
    }

    /// Build a cache with the specified policy.
    ///
    /// # Panics
    ///
    /// Panics on invalid parameters; see [`try_build`](Self::try_build).
    ///
    /// # Example
    ///
    /// ```rust
    /// use midcache::builder::{CacheBuilder, CachePolicy};
    ///
    /// let lru = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Lru);
    /// let mid = CacheBuilder::new(100)
    ///     .build::<u64, String>(CachePolicy::Midpoint { old_ratio: 0.25 });
    /// assert_eq!(lru.capacity(), mid.capacity());
    /// ```
    pub fn build<K, V>(self, policy: CachePolicy) -> Cache<K, V>
    where
        K: Clone + Eq + Hash,
    {
        match self.try_build(policy) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }
}
