pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::{LruMetricsSnapshot, MidpointMetricsSnapshot};
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::{MetricsExporter, MetricsSnapshotProvider};
pub use crate::policy::lru::LruCache;
pub use crate::policy::midpoint::MidpointCache;
pub use crate::traits::{
    CoreCache, LruCacheTrait, MutableCache, ReadOnlyCache, SegmentedCacheTrait,
};
