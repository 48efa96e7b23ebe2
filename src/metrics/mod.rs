//! Optional counters for cache policies (`metrics` feature).

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
