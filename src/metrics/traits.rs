//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and export are split into small traits so cache
//! policy code only ever bumps counters.
//!
//! ```text
//!                  ┌─────────────────────────────┐
//!                  │     CoreMetricsRecorder     │
//!                  │  get_hit/get_miss/insert    │
//!                  │  evict/clear                │
//!                  └──────────────┬──────────────┘
//!                     ┌───────────┴────────────┐
//!                     ▼                        ▼
//!              ┌─────────────┐       ┌──────────────────────┐
//!              │ LruMetrics  │       │ MidpointMetrics      │
//!              │ Recorder    │       │ Recorder             │
//!              │ pop/touch   │       │ promotion/shift/     │
//!              └─────────────┘       │ old vs new eviction  │
//!                                    └──────────────────────┘
//!
//!   Consumption:
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters every policy records.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Plain recency-list counters.
pub trait LruMetricsRecorder: CoreMetricsRecorder {
    fn record_pop_lru_call(&mut self);
    fn record_pop_lru_found(&mut self);
    fn record_touch_call(&mut self);
    fn record_touch_found(&mut self);
}

/// Region traffic of the midpoint-insertion policy.
pub trait MidpointMetricsRecorder: CoreMetricsRecorder {
    /// A hit on an old-region entry moved it to the new region.
    fn record_old_to_new_promotion(&mut self);
    /// The old region outgrew its target and donated its head.
    fn record_boundary_shift(&mut self);
    fn record_old_eviction(&mut self);
    fn record_new_eviction(&mut self);
}

/// Produces a point-in-time copy of a cache's counters and gauges.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Publishes snapshots to a monitoring backend.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
