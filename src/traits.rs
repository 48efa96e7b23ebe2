//! # Cache Trait Hierarchy
//!
//! Shared interface for the two policies in this crate so that workloads,
//! benches and the [`builder`](crate::builder) can drive either one.
//!
//! ```text
//!                  ┌──────────────────────────────┐
//!                  │      ReadOnlyCache<K, V>     │
//!                  │  contains / len / capacity   │
//!                  └──────────────┬───────────────┘
//!                                 ▼
//!                  ┌──────────────────────────────┐
//!                  │        CoreCache<K, V>       │
//!                  │  insert / get / clear        │
//!                  └──────────────┬───────────────┘
//!                                 ▼
//!                  ┌──────────────────────────────┐
//!                  │      MutableCache<K, V>      │
//!                  │  remove / remove_batch       │
//!                  └───────┬──────────────┬───────┘
//!                          ▼              ▼
//!        ┌──────────────────────┐   ┌───────────────────────────┐
//!        │ LruCacheTrait<K, V>  │   │ SegmentedCacheTrait<K, V> │
//!        │ pop_lru / peek_lru   │   │ old_len / max_old_len     │
//!        │ touch                │   │ is_old / peek_victim      │
//!        └──────────────────────┘   └───────────────────────────┘
//!             LruCache                    MidpointCache
//! ```
//!
//! `get` takes `&mut self` on purpose: a hit reorders the recency list (and,
//! for the midpoint policy, may move the region boundary). Use
//! [`ReadOnlyCache::contains`] or the inherent `peek` methods to look without
//! touching eviction order.
//!
//! ## Thread Safety
//!
//! None of the implementations synchronize internally. Share a cache between
//! threads by putting the whole cache behind one lock; every method keeps the
//! map, list and region bookkeeping consistent before it returns, so the lock
//! only needs to cover the call boundary.

/// Non-mutating queries every cache answers.
pub trait ReadOnlyCache<K, V> {
    /// Returns `true` if `key` is cached. Never affects eviction order.
    fn contains(&self, key: &K) -> bool;

    /// Number of cached entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries held before eviction.
    fn capacity(&self) -> usize;
}

/// Insert/lookup operations shared by all policies.
///
/// # Example
///
/// ```
/// use midcache::policy::lru::LruCache;
/// use midcache::policy::midpoint::MidpointCache;
/// use midcache::traits::{CoreCache, ReadOnlyCache};
///
/// fn warm<C: CoreCache<u64, String>>(cache: &mut C, keys: std::ops::Range<u64>) {
///     for k in keys {
///         cache.insert(k, format!("page-{k}"));
///     }
/// }
///
/// let mut lru = LruCache::new(8);
/// let mut mid = MidpointCache::new(8, 0.5);
/// warm(&mut lru, 0..4);
/// warm(&mut mid, 0..4);
/// assert_eq!(lru.len(), mid.len());
/// ```
pub trait CoreCache<K, V>: ReadOnlyCache<K, V> {
    /// Inserts or overwrites `key`, returning the previous value on overwrite.
    ///
    /// A fresh key arriving at a full cache evicts exactly one entry first.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up `key`, applying the policy's hit bookkeeping.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Drops every entry and resets policy state.
    fn clear(&mut self);
}

/// Caches that allow removing an arbitrary key.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key` and returns its value.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes each key in order; results line up with `keys`.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.remove(key)).collect()
    }
}

/// Pure recency-ordered caches.
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least recently used entry without reordering.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks `key` most recently used; `false` if absent.
    fn touch(&mut self, key: &K) -> bool;
}

/// Caches that split one recency list into a protected "new" region at the
/// head and a probationary "old" region at the tail.
pub trait SegmentedCacheTrait<K, V>: MutableCache<K, V> {
    /// Entries currently in the old region.
    fn old_len(&self) -> usize;

    /// Target size of the old region.
    fn max_old_len(&self) -> usize;

    /// `Some(true)` if `key` sits in the old region, `None` if absent.
    fn is_old(&self, key: &K) -> Option<bool>;

    /// The entry the next miss at full capacity would evict.
    fn peek_victim(&self) -> Option<(&K, &V)>;
}
