//! # Least Recently Used (LRU) Cache
//!
//! Plain recency-ordered cache. Every insert and every hit moves the entry to
//! the head; misses at full capacity evict the tail. This is the baseline the
//! [`MidpointCache`](crate::policy::midpoint::MidpointCache) is measured
//! against: a single scan of one-off keys flushes everything here.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                           LruCache<K, V>                             │
//!   │                                                                      │
//!   │   FxHashMap<K, SlotId>                                               │
//!   │   ┌─────────┬─────────┐                                              │
//!   │   │ page_1  │ id_1 ───┼──────┐                                       │
//!   │   │ page_2  │ id_2 ───┼──────┼──────────┐                            │
//!   │   │ page_3  │ id_3 ───┼──────┼──────────┼──────────┐                 │
//!   │   └─────────┴─────────┘      ▼          ▼          ▼                 │
//!   │   IntrusiveList<Entry>  head ► [id_1] ◄► [id_2] ◄► [id_3] ◄ tail     │
//!   │                          (MRU)                          (LRU)        │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation   | Time | Notes                           |
//! |-------------|------|---------------------------------|
//! | `insert`    | O(1) | may evict the tail              |
//! | `get`       | O(1) | moves to head                   |
//! | `peek`      | O(1) | no reordering                   |
//! | `touch`     | O(1) | moves to head without reading   |
//! | `pop_lru`   | O(1) | removes the tail                |
//! | `remove`    | O(1) |                                 |
//!
//! ## Example
//!
//! ```
//! use midcache::policy::lru::LruCache;
//!
//! let mut cache = LruCache::new(2);
//! cache.insert(1, "one");
//! cache.insert(2, "two");
//! cache.get(&1);
//!
//! cache.insert(3, "three"); // evicts 2
//! assert!(!cache.contains(&2));
//! assert_eq!(cache.peek_lru(), Some((&1, &"one")));
//! ```

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::{IntrusiveList, SlotId};
use crate::error::{ConfigError, InvariantError};
use crate::policy::MAX_PREALLOC;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, LruMetricsRecorder, MetricsSnapshotProvider};
use crate::traits::{CoreCache, LruCacheTrait, MutableCache, ReadOnlyCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Fixed-capacity LRU cache.
pub struct LruCache<K, V> {
    map: FxHashMap<K, SlotId>,
    list: IntrusiveList<Entry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::zero_capacity());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(capacity, "lru cache created");

        let reserve = capacity.min(MAX_PREALLOC);
        Ok(Self {
            map: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            list: IntrusiveList::with_capacity(reserve),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        })
    }

    /// # Panics
    ///
    /// Panics when `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Reads a value without changing recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let &id = self.map.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.list.iter().map(|entry| &entry.key)
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = self.lookup_and_touch(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.lookup_and_touch(key)?;
        self.list.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Inserts at the head. Overwrites move the entry to the head and return
    /// the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.map.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let previous = self
                .list
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));
            self.list.move_to_front(id);
            return previous;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.map.len() >= self.capacity {
            self.evict_tail();
        }

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.map.insert(key, id);

        debug_assert_eq!(self.map.len(), self.list.len());
        None
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.map.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_call();

        let entry = self.list.pop_back()?;
        self.map.remove(&entry.key);

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_found();

        Some((entry.key, entry.value))
    }

    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Marks `key` most recently used without reading it.
    pub fn touch(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();

        let Some(&id) = self.map.get(key) else {
            return false;
        };
        self.list.move_to_front(id);

        #[cfg(feature = "metrics")]
        self.metrics.record_touch_found();
        true
    }

    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.map.clear();
        self.list.clear();
    }

    fn lookup_and_touch(&mut self, key: &K) -> Option<SlotId> {
        let Some(&id) = self.map.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.list.move_to_front(id);
        Some(id)
    }

    fn evict_tail(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        if let Some(entry) = self.list.pop_back() {
            self.map.remove(&entry.key);

            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();

            #[cfg(feature = "tracing")]
            tracing::trace!(len = self.map.len(), "lru cache evicted tail");
        }
    }

    /// Audits list links and map/list agreement.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.validate()?;
        if self.map.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "map holds {} keys but list holds {} nodes",
                self.map.len(),
                self.list.len()
            )));
        }
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.map.len(),
                self.capacity
            )));
        }
        for id in self.list.iter_ids() {
            let matches = self
                .list
                .get(id)
                .is_some_and(|entry| self.map.get(&entry.key) == Some(&id));
            if !matches {
                return Err(InvariantError::new(format!(
                    "list node {id:?} is not the map's node for its key"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            core: self.metrics.core_snapshot(),
            pop_lru_calls: self.metrics.pop_lru_calls,
            pop_lru_found: self.metrics.pop_lru_found,
            touch_calls: self.metrics.touch_calls,
            touch_found: self.metrics.touch_found,
            cache_len: self.map.len(),
            capacity: self.capacity,
        }
    }

    pub fn reset_metrics(&mut self) {
        self.metrics = LruMetrics::default();
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new(128)
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> ReadOnlyCache<K, V> for LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> CoreCache<K, V> for LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        LruCache::insert(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        LruCache::get(self, key)
    }

    fn clear(&mut self) {
        LruCache::clear(self);
    }
}

impl<K, V> MutableCache<K, V> for LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        LruCache::pop_lru(self)
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        LruCache::peek_lru(self)
    }

    fn touch(&mut self, key: &K) -> bool {
        LruCache::touch(self, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod correctness {
        use super::*;

        mod basic_behavior {
            use super::*;

            #[test]
            fn test_new_cache_creation() {
                let cache: LruCache<u32, u32> = LruCache::new(5);
                assert_eq!(cache.capacity(), 5);
                assert_eq!(cache.len(), 0);
                assert!(cache.is_empty());
            }

            #[test]
            fn test_zero_capacity_rejected() {
                let err = LruCache::<u32, u32>::try_new(0).unwrap_err();
                assert!(err.to_string().contains("capacity"));
            }

            #[test]
            fn test_huge_capacity_grows_on_demand() {
                let mut cache = LruCache::<u64, u64>::try_new(usize::MAX).unwrap();
                assert_eq!(cache.capacity(), usize::MAX);
                for key in 0..10_000u64 {
                    cache.insert(key, key);
                }
                assert_eq!(cache.len(), 10_000);
                assert_eq!(cache.peek_lru(), Some((&0, &0)));
                assert!(cache.check_invariants().is_ok());
            }

            #[test]
            #[should_panic(expected = "capacity")]
            fn test_new_panics_on_zero_capacity() {
                let _ = LruCache::<u32, u32>::new(0);
            }

            #[test]
            fn test_insert_and_get() {
                let mut cache = LruCache::new(3);
                assert_eq!(cache.insert(1, "one"), None);
                assert_eq!(cache.get(&1), Some(&"one"));
                assert_eq!(cache.get(&2), None);
            }

            #[test]
            fn test_insert_duplicate_key() {
                let mut cache = LruCache::new(3);
                cache.insert(1, 100);
                assert_eq!(cache.insert(1, 200), Some(100));
                assert_eq!(cache.len(), 1);
                assert_eq!(cache.peek(&1), Some(&200));
            }

            #[test]
            fn test_lru_eviction_basic() {
                let mut cache = LruCache::new(2);
                cache.insert(1, 100);
                cache.insert(2, 200);
                cache.insert(3, 300);
                assert_eq!(cache.len(), 2);
                assert!(!cache.contains(&1));
                assert!(cache.contains(&2));
                assert!(cache.contains(&3));
            }

            #[test]
            fn test_access_updates_lru_order() {
                let mut cache = LruCache::new(3);
                cache.insert(1, 100);
                cache.insert(2, 200);
                cache.insert(3, 300);
                cache.get(&1);

                cache.insert(4, 400);
                assert!(cache.contains(&1));
                assert!(!cache.contains(&2));
                assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![4, 1, 3]);
            }

            #[test]
            fn test_overwrite_refreshes_recency() {
                let mut cache = LruCache::new(2);
                cache.insert(1, 100);
                cache.insert(2, 200);
                cache.insert(1, 101);
                cache.insert(3, 300);
                assert!(cache.contains(&1));
                assert!(!cache.contains(&2));
            }

            #[test]
            fn test_peek_does_not_update_lru() {
                let mut cache = LruCache::new(2);
                cache.insert(1, 100);
                cache.insert(2, 200);
                assert_eq!(cache.peek(&1), Some(&100));
                cache.insert(3, 300);
                assert!(!cache.contains(&1));
            }

            #[test]
            fn test_touch_updates_lru_order() {
                let mut cache = LruCache::new(2);
                cache.insert(1, 100);
                cache.insert(2, 200);
                assert!(cache.touch(&1));
                assert!(!cache.touch(&9));
                cache.insert(3, 300);
                assert!(cache.contains(&1));
                assert!(!cache.contains(&2));
            }

            #[test]
            fn test_pop_and_peek_lru() {
                let mut cache = LruCache::new(3);
                assert_eq!(cache.pop_lru(), None);
                assert_eq!(cache.peek_lru(), None);

                cache.insert(1, 100);
                cache.insert(2, 200);
                assert_eq!(cache.peek_lru(), Some((&1, &100)));
                assert_eq!(cache.pop_lru(), Some((1, 100)));
                assert_eq!(cache.len(), 1);
                assert!(!cache.contains(&1));
            }

            #[test]
            fn test_get_mut_edits_and_promotes() {
                let mut cache = LruCache::new(2);
                cache.insert(1, 100);
                cache.insert(2, 200);
                if let Some(v) = cache.get_mut(&1) {
                    *v = 111;
                }
                cache.insert(3, 300);
                assert_eq!(cache.peek(&1), Some(&111));
                assert!(!cache.contains(&2));
            }

            #[test]
            fn test_remove_and_clear() {
                let mut cache = LruCache::new(3);
                cache.extend([(1, 1), (2, 2), (3, 3)]);
                assert_eq!(cache.remove(&2), Some(2));
                assert_eq!(cache.remove(&2), None);
                assert_eq!(cache.len(), 2);
                cache.clear();
                assert!(cache.is_empty());
                assert!(cache.check_invariants().is_ok());
            }
        }

        mod edge_cases {
            use super::*;

            #[test]
            fn test_single_capacity_eviction_patterns() {
                let mut cache = LruCache::new(1);
                cache.insert("a", 1);
                cache.insert("b", 2);
                assert!(!cache.contains(&"a"));
                assert_eq!(cache.get(&"b"), Some(&2));
                cache.insert("b", 3);
                assert_eq!(cache.len(), 1);
            }

            #[test]
            fn test_scan_flushes_working_set() {
                let mut cache = LruCache::new(10);
                for k in 0..5 {
                    cache.insert(k, k);
                    cache.get(&k);
                }
                for k in 100..110 {
                    cache.insert(k, k);
                }
                assert!((0..5).all(|k| !cache.contains(&k)));
            }

            #[test]
            fn test_invariants_hold_through_churn() {
                let mut cache = LruCache::new(4);
                for i in 0..50u32 {
                    cache.insert(i % 7, i);
                    if i % 3 == 0 {
                        cache.get(&(i % 5));
                    }
                    if i % 11 == 0 {
                        cache.remove(&(i % 7));
                    }
                    assert!(cache.check_invariants().is_ok());
                }
            }

            #[test]
            fn test_default_and_debug() {
                let cache: LruCache<String, u8> = LruCache::default();
                assert_eq!(cache.capacity(), 128);
                assert!(format!("{cache:?}").contains("LruCache"));
            }
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn test_metrics_snapshot_counts() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.get(&1);
            cache.get(&9);
            cache.insert(3, 3);
            cache.touch(&1);
            cache.pop_lru();

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.core.get_hits, 1);
            assert_eq!(snap.core.get_misses, 1);
            assert_eq!(snap.core.evicted_entries, 1);
            assert_eq!(snap.touch_found, 1);
            assert_eq!(snap.pop_lru_found, 1);
            assert_eq!(snap.cache_len, 1);
            assert_eq!(snap.hit_rate(), 0.5);
        }
    }
}

#[cfg(test)]
mod property_tests {
    use std::collections::VecDeque;

    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Matches a naive recency deque (front = MRU) on every operation.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_matches_reference_model(
            capacity in 1usize..24,
            ops in prop::collection::vec((0u8..3, 0u8..32, any::<u16>()), 0..300)
        ) {
            let mut cache = LruCache::new(capacity);
            let mut model: VecDeque<(u8, u16)> = VecDeque::new();

            for (op, key, value) in ops {
                let pos = model.iter().position(|(k, _)| *k == key);
                match op {
                    0 => {
                        let expected_prev = pos.map(|i| model[i].1);
                        if let Some(i) = pos {
                            model.remove(i);
                        } else if model.len() == capacity {
                            model.pop_back();
                        }
                        model.push_front((key, value));
                        prop_assert_eq!(cache.insert(key, value), expected_prev);
                    },
                    1 => {
                        let expected = pos.map(|i| model[i].1);
                        if let Some(i) = pos {
                            let entry = model.remove(i).unwrap();
                            model.push_front(entry);
                        }
                        prop_assert_eq!(cache.get(&key).copied(), expected);
                    },
                    _ => {
                        let expected = pos.and_then(|i| model.remove(i)).map(|(_, v)| v);
                        prop_assert_eq!(cache.remove(&key), expected);
                    },
                }

                let keys: Vec<u8> = cache.keys().copied().collect();
                let model_keys: Vec<u8> = model.iter().map(|(k, _)| *k).collect();
                prop_assert_eq!(keys, model_keys);
                prop_assert!(cache.check_invariants().is_ok());
            }
        }
    }
}
