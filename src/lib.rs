//! midcache: midpoint-insertion (segmented LRU) cache and a plain LRU baseline.
//!
//! [`MidpointCache`] keeps one recency list split into a protected "new"
//! region and a probationary "old" region. Fresh keys enter at the midpoint,
//! so one-off scans churn through the old region without flushing entries
//! that were read more than once. [`LruCache`] is the classic head-insertion
//! list, kept for comparison.
//!
//! ```
//! use midcache::prelude::*;
//!
//! let mut cache = MidpointCache::new(2, 0.7);
//! cache.insert(1, 1);
//! cache.insert(2, 2);
//! cache.get(&1);
//! cache.insert(3, 3);
//! assert!(!cache.contains(&2));
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;

#[cfg(feature = "metrics")]
pub mod metrics;

pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::ds::{IntrusiveList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::{LruMetricsSnapshot, MidpointMetricsSnapshot};
pub use crate::policy::lru::LruCache;
pub use crate::policy::midpoint::MidpointCache;
