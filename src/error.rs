//! Error types for midcache.
//!
//! - [`ConfigError`]: a constructor was handed an unusable capacity or ratio.
//!   Every cache has a `try_*` constructor returning it and a panicking
//!   convenience constructor that forwards its message.
//! - [`InvariantError`]: a structural audit (`check_invariants`) found the
//!   map, list, midpoint or region counter out of agreement. Seeing one is a
//!   bug in this crate, not a recoverable condition.
//!
//! ```
//! use midcache::error::ConfigError;
//! use midcache::policy::midpoint::MidpointCache;
//!
//! let ok: Result<MidpointCache<u32, u32>, ConfigError> = MidpointCache::try_new(64, 0.375);
//! assert!(ok.is_ok());
//!
//! let err = MidpointCache::<u32, u32>::try_new(64, 1.0).unwrap_err();
//! assert!(err.message().contains("old_ratio"));
//! ```

use std::fmt;

/// Rejected construction parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Capacity of zero; a cache must be able to hold at least one entry.
    pub(crate) fn zero_capacity() -> Self {
        Self::new("cache capacity must be greater than zero")
    }

    /// Old-region ratio outside the open interval `(0.0, 1.0)` or not finite.
    pub(crate) fn old_ratio_out_of_range(ratio: f64) -> Self {
        Self::new(format!("old_ratio must be within (0.0, 1.0), got {ratio}"))
    }

    /// Returns the error description.
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Describes the first internal invariant found broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}
