//! Eviction policies.
//!
//! - [`lru`]: plain recency list, new keys enter at the head.
//! - [`midpoint`]: one recency list split into new and old regions; new keys
//!   enter at the midpoint and must be read again to reach the head.

pub mod lru;
pub mod midpoint;

/// Upper bound on entries reserved at construction. Larger caches grow the
/// map and list on demand, so an oversized `capacity` never aborts `try_new`.
pub(crate) const MAX_PREALLOC: usize = 4096;
