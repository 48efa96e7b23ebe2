//! Midpoint-insertion cache (buffer-pool style segmented LRU).
//!
//! One recency list is split by a movable boundary into a protected **new**
//! region at the head and a probationary **old** region at the tail. Fresh
//! keys enter at the head of the old region, *not* at the head of the list,
//! so a burst of one-off inserts only ever displaces other unproven entries.
//! A hit on an old entry promotes it into the new region.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       MidpointCache<K, V> Layout                        │
//! │                                                                         │
//! │   map: FxHashMap<K, SlotId>        list: IntrusiveList<Entry<K, V>>     │
//! │                                                                         │
//! │   head                          midpoint                        tail    │
//! │    │                               │                              │     │
//! │    ▼                               ▼                              ▼     │
//! │   [h1] ◄──► [h2] ◄──► [h3] ◄──► [o1] ◄──► [o2] ◄──► [o3] ◄──► [o4]      │
//! │   └──────── new region ───────┘  └──────────── old region ──────────┘   │
//! │    promoted / donated entries      fresh inserts, next victims at tail  │
//! │                                                                         │
//! │   old_len == |midpoint ..= tail| <= max_old_len = ⌊capacity × ratio⌋    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! ```text
//!   get(k) hit:
//!     if k is old: flag new, old_len -= 1, if k == midpoint: midpoint = next(k)
//!     move k to head
//!
//!   insert(k, v) overwrite:  replace value, then same bookkeeping as get
//!
//!   insert(k, v) fresh:
//!     1. full?   evict tail (old_len -= 1 if it was old; clear midpoint if it was it)
//!     2. splice  ahead of midpoint (or at tail when the old region is empty)
//!                flag old, midpoint = k, old_len += 1
//!     3. shift   if old_len > max_old_len: flag midpoint new,
//!                midpoint = next(midpoint), old_len -= 1
//! ```
//!
//! | Operation  | Time | Notes                                   |
//! |------------|------|-----------------------------------------|
//! | `get`      | O(1) | promotes old entries                    |
//! | `insert`   | O(1) | at most one eviction, one boundary step |
//! | `remove`   | O(1) | keeps the boundary consistent           |
//! | `peek`     | O(1) | no reordering                           |
//! | `clear`    | O(n) |                                         |
//!
//! ## Example Usage
//!
//! ```
//! use midcache::policy::midpoint::MidpointCache;
//!
//! let mut cache = MidpointCache::new(2, 0.7);
//! cache.insert(1, "one");
//! cache.insert(2, "two");
//!
//! // The read promotes 1 out of the old region.
//! assert_eq!(cache.get(&1), Some(&"one"));
//!
//! // 2 was never read, so it is the victim.
//! cache.insert(3, "three");
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.get(&1), Some(&"one"));
//! assert_eq!(cache.get(&3), Some(&"three"));
//! ```
//!
//! ## Thread Safety
//!
//! Not synchronized. Wrap the whole cache in a single lock for shared use;
//! map, list, midpoint and counter must move together.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::{IntrusiveList, SlotId};
use crate::error::{ConfigError, InvariantError};
use crate::policy::MAX_PREALLOC;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::MidpointMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::MidpointMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, MetricsSnapshotProvider, MidpointMetricsRecorder,
};
use crate::traits::{CoreCache, MutableCache, ReadOnlyCache, SegmentedCacheTrait};

/// Which side of the midpoint an entry lives on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Region {
    /// Head side: promoted entries and entries donated by a boundary shift.
    New,
    /// Tail side: inserted but not yet read.
    Old,
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    region: Region,
}

/// Fixed-capacity cache with midpoint insertion.
///
/// # Example
///
/// ```
/// use midcache::policy::midpoint::MidpointCache;
///
/// let mut cache = MidpointCache::new(4, 0.5);
/// cache.insert("a", 1);
/// assert_eq!(cache.is_old(&"a"), Some(true));
///
/// cache.get(&"a");
/// assert_eq!(cache.is_old(&"a"), Some(false));
/// assert_eq!(cache.old_len(), 0);
/// ```
pub struct MidpointCache<K, V> {
    map: FxHashMap<K, SlotId>,
    list: IntrusiveList<Entry<K, V>>,
    /// Head of the old region; `None` iff the old region is empty.
    midpoint: Option<SlotId>,
    old_len: usize,
    max_old_len: usize,
    old_ratio: f64,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: MidpointMetrics,
}

impl<K, V> MidpointCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Share of capacity reserved for the old region by [`with_capacity`](Self::with_capacity).
    pub const DEFAULT_OLD_RATIO: f64 = 0.375;

    /// Creates a cache, validating parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero or `old_ratio` is not a
    /// finite value strictly between 0 and 1.
    pub fn try_new(capacity: usize, old_ratio: f64) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::zero_capacity());
        }
        if !old_ratio.is_finite() || old_ratio <= 0.0 || old_ratio >= 1.0 {
            return Err(ConfigError::old_ratio_out_of_range(old_ratio));
        }

        let max_old_len = (capacity as f64 * old_ratio).floor() as usize;

        #[cfg(feature = "tracing")]
        tracing::debug!(capacity, old_ratio, max_old_len, "midpoint cache created");

        let reserve = capacity.min(MAX_PREALLOC);
        Ok(Self {
            map: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            list: IntrusiveList::with_capacity(reserve),
            midpoint: None,
            old_len: 0,
            max_old_len,
            old_ratio,
            capacity,
            #[cfg(feature = "metrics")]
            metrics: MidpointMetrics::default(),
        })
    }

    /// Creates a cache.
    ///
    /// # Panics
    ///
    /// Panics on invalid parameters; see [`try_new`](Self::try_new).
    pub fn new(capacity: usize, old_ratio: f64) -> Self {
        match Self::try_new(capacity, old_ratio) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a cache with [`DEFAULT_OLD_RATIO`](Self::DEFAULT_OLD_RATIO).
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity, Self::DEFAULT_OLD_RATIO)
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

    /// Number of entries currently in the old region.
    #[inline]
    pub fn old_len(&self) -> usize {
        self.old_len
    }

    /// Target old-region size, `⌊capacity × old_ratio⌋`.
    #[inline]
    pub fn max_old_len(&self) -> usize {
        self.max_old_len
    }

    #[inline]
    pub fn old_ratio(&self) -> f64 {
        self.old_ratio
    }

    /// Returns `true` if the key is cached. Does not promote.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Reads a value without promotion or reordering.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let &id = self.map.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// `Some(true)` if the key is in the old region, `Some(false)` if in the
    /// new region, `None` if absent.
    pub fn is_old(&self, key: &K) -> Option<bool> {
        let &id = self.map.get(key)?;
        self.list.get(id).map(|entry| entry.region == Region::Old)
    }

    /// The tail entry: what the next miss at full capacity evicts.
    pub fn peek_victim(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Keys from head (most recently promoted) to tail (next victim).
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.list.iter().map(|entry| &entry.key)
    }

    /// Looks up `key`, promoting it out of the old region and moving it to
    /// the head on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = self.lookup_and_touch(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Like [`get`](Self::get), returning a mutable reference.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.lookup_and_touch(key)?;
        self.list.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Inserts or overwrites `key`.
    ///
    /// An overwrite is treated as an access: the entry is promoted and moved
    /// to the head, and the previous value is returned. A fresh key at full
    /// capacity evicts the tail first, then enters at the head of the old
    /// region.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.map.get(&key) {
            let previous = self
                .list
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));
            self.promote(id);

            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            self.debug_check();
            return previous;
        }

        if self.map.len() >= self.capacity {
            self.evict_tail();
        }

        let id = self.insert_at_midpoint(Entry {
            key: key.clone(),
            value,
            region: Region::Old,
        });
        self.map.insert(key, id);
        self.shift_boundary();

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
        self.debug_check();
        None
    }

    /// Removes `key`, keeping the midpoint and old-region counter consistent.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.map.remove(key)?;
        if self.midpoint == Some(id) {
            self.midpoint = self.list.next_id(id);
        }
        let entry = self.list.remove(id)?;
        if entry.region == Region::Old {
            self.old_len -= 1;
        }
        self.debug_check();
        Some(entry.value)
    }

    /// Drops every entry and resets the boundary.
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
        self.midpoint = None;
        self.old_len = 0;

        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    fn lookup_and_touch(&mut self, key: &K) -> Option<SlotId> {
        let Some(&id) = self.map.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.promote(id);
        self.debug_check();
        Some(id)
    }

    /// Hit bookkeeping shared by `get` and overwrite: leave the old region if
    /// in it, then move to the head unconditionally.
    fn promote(&mut self, id: SlotId) {
        let was_old = match self.list.get_mut(id) {
            Some(entry) if entry.region == Region::Old => {
                entry.region = Region::New;
                true
            },
            _ => false,
        };

        if was_old {
            self.old_len -= 1;
            if self.midpoint == Some(id) {
                self.midpoint = self.list.next_id(id);
            }

            #[cfg(feature = "metrics")]
            self.metrics.record_old_to_new_promotion();
        }

        self.list.move_to_front(id);
    }

    fn evict_tail(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let Some(victim) = self.list.back_id() else {
            return;
        };
        if self.midpoint == Some(victim) {
            self.midpoint = None;
        }
        let Some(entry) = self.list.remove(victim) else {
            return;
        };
        self.map.remove(&entry.key);

        let was_old = entry.region == Region::Old;
        if was_old {
            self.old_len -= 1;
        }

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_evicted_entry();
            if was_old {
                self.metrics.record_old_eviction();
            } else {
                self.metrics.record_new_eviction();
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            from_old = was_old,
            len = self.map.len(),
            old_len = self.old_len,
            "midpoint cache evicted tail"
        );
    }

    /// Places a fresh entry at the head of the old region and makes it the
    /// midpoint.
    fn insert_at_midpoint(&mut self, entry: Entry<K, V>) -> SlotId {
        let id = match self.midpoint {
            Some(anchor) => match self.list.insert_before(anchor, entry) {
                Ok(id) => id,
                Err(entry) => {
                    debug_assert!(false, "midpoint {anchor:?} is not a list node");
                    self.list.push_back(entry)
                },
            },
            // Old region empty: it restarts as the tail-side suffix.
            None => self.list.push_back(entry),
        };
        self.midpoint = Some(id);
        self.old_len += 1;
        id
    }

    /// Hands the head of the old region to the new region when the old region
    /// has grown past its target.
    fn shift_boundary(&mut self) {
        if self.old_len <= self.max_old_len {
            return;
        }
        let Some(boundary) = self.midpoint else {
            debug_assert!(false, "old_len {} with no midpoint", self.old_len);
            return;
        };

        if let Some(entry) = self.list.get_mut(boundary) {
            entry.region = Region::New;
        }
        self.midpoint = self.list.next_id(boundary);
        self.old_len -= 1;

        #[cfg(feature = "metrics")]
        self.metrics.record_boundary_shift();

        #[cfg(feature = "tracing")]
        tracing::trace!(
            old_len = self.old_len,
            max_old_len = self.max_old_len,
            "midpoint boundary shifted"
        );
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert_eq!(self.map.len(), self.list.len(), "map/list size mismatch");
        debug_assert!(self.map.len() <= self.capacity, "over capacity");
        debug_assert!(self.old_len <= self.max_old_len, "old region over target");
        debug_assert_eq!(
            self.midpoint.is_none(),
            self.old_len == 0,
            "midpoint presence disagrees with old_len {}",
            self.old_len
        );
    }

    /// Audits the whole structure.
    ///
    /// Checks list links, map/list agreement, capacity, that every entry
    /// before the midpoint is new and every entry from it to the tail is old,
    /// and that `old_len` counts exactly those old entries.
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

        let mut in_old_region = false;
        let mut flagged_old = 0usize;
        for id in self.list.iter_ids() {
            let entry = self
                .list
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("list yielded dead handle {id:?}")))?;
            if self.map.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(format!(
                    "list node {id:?} is not the map's node for its key"
                )));
            }
            if Some(id) == self.midpoint {
                in_old_region = true;
            }
            match (entry.region, in_old_region) {
                (Region::Old, true) => flagged_old += 1,
                (Region::New, false) => {},
                (Region::Old, false) => {
                    return Err(InvariantError::new(format!(
                        "old entry {id:?} sits ahead of the midpoint"
                    )));
                },
                (Region::New, true) => {
                    return Err(InvariantError::new(format!(
                        "new entry {id:?} sits inside the old region"
                    )));
                },
            }
        }

        if self.midpoint.is_some() && !in_old_region {
            return Err(InvariantError::new(format!(
                "midpoint {:?} is not reachable from head",
                self.midpoint
            )));
        }
        if flagged_old != self.old_len {
            return Err(InvariantError::new(format!(
                "old_len is {} but {} entries are flagged old",
                self.old_len, flagged_old
            )));
        }
        if self.old_len > self.max_old_len {
            return Err(InvariantError::new(format!(
                "old_len {} exceeds max_old_len {}",
                self.old_len, self.max_old_len
            )));
        }
        Ok(())
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MidpointCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Counters plus gauges captured now.
    pub fn metrics_snapshot(&self) -> MidpointMetricsSnapshot {
        MidpointMetricsSnapshot {
            core: self.metrics.core_snapshot(),
            old_to_new_promotions: self.metrics.old_to_new_promotions,
            boundary_shifts: self.metrics.boundary_shifts,
            old_evictions: self.metrics.old_evictions,
            new_evictions: self.metrics.new_evictions,
            cache_len: self.map.len(),
            old_len: self.old_len,
            max_old_len: self.max_old_len,
            capacity: self.capacity,
        }
    }

    pub fn reset_metrics(&mut self) {
        self.metrics = MidpointMetrics::default();
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<MidpointMetricsSnapshot> for MidpointCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn snapshot(&self) -> MidpointMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> Default for MidpointCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Capacity 128 with the default old ratio.
    fn default() -> Self {
        Self::with_capacity(128)
    }
}

impl<K, V> fmt::Debug for MidpointCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidpointCache")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("old_len", &self.old_len)
            .field("max_old_len", &self.max_old_len)
            .field("old_ratio", &self.old_ratio)
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for MidpointCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> ReadOnlyCache<K, V> for MidpointCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn contains(&self, key: &K) -> bool {
        MidpointCache::contains(self, key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> CoreCache<K, V> for MidpointCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        MidpointCache::insert(self, key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        MidpointCache::get(self, key)
    }

    fn clear(&mut self) {
        MidpointCache::clear(self);
    }
}

impl<K, V> MutableCache<K, V> for MidpointCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        MidpointCache::remove(self, key)
    }
}

impl<K, V> SegmentedCacheTrait<K, V> for MidpointCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn old_len(&self) -> usize {
        self.old_len
    }

    fn max_old_len(&self) -> usize {
        self.max_old_len
    }

    fn is_old(&self, key: &K) -> Option<bool> {
        MidpointCache::is_old(self, key)
    }

    fn peek_victim(&self) -> Option<(&K, &V)> {
        MidpointCache::peek_victim(self)
    }
}
