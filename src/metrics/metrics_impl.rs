use crate::metrics::snapshot::CoreMetricsSnapshot;
use crate::metrics::traits::{CoreMetricsRecorder, LruMetricsRecorder, MidpointMetricsRecorder};

/// Shared counters, embedded in every policy's metrics struct.
#[derive(Debug, Default, Clone)]
pub struct CoreMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub clear_calls: u64,
}

impl CoreMetrics {
    pub fn snapshot(&self) -> CoreMetricsSnapshot {
        CoreMetricsSnapshot {
            get_calls: self.get_calls,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            insert_calls: self.insert_calls,
            insert_updates: self.insert_updates,
            insert_new: self.insert_new,
            evict_calls: self.evict_calls,
            evicted_entries: self.evicted_entries,
            clear_calls: self.clear_calls,
        }
    }
}

impl CoreMetricsRecorder for CoreMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

/// Forwards the core recorder to an embedded `core: CoreMetrics` field.
macro_rules! delegate_core_recorder {
    ($ty:ty) => {
        impl CoreMetricsRecorder for $ty {
            fn record_get_hit(&mut self) {
                self.core.record_get_hit();
            }

            fn record_get_miss(&mut self) {
                self.core.record_get_miss();
            }

            fn record_insert_call(&mut self) {
                self.core.record_insert_call();
            }

            fn record_insert_new(&mut self) {
                self.core.record_insert_new();
            }

            fn record_insert_update(&mut self) {
                self.core.record_insert_update();
            }

            fn record_evict_call(&mut self) {
                self.core.record_evict_call();
            }

            fn record_evicted_entry(&mut self) {
                self.core.record_evicted_entry();
            }

            fn record_clear(&mut self) {
                self.core.record_clear();
            }
        }
    };
}

#[derive(Debug, Default, Clone)]
pub struct LruMetrics {
    pub core: CoreMetrics,
    pub pop_lru_calls: u64,
    pub pop_lru_found: u64,
    pub touch_calls: u64,
    pub touch_found: u64,
}

impl LruMetrics {
    pub fn core_snapshot(&self) -> CoreMetricsSnapshot {
        self.core.snapshot()
    }
}

delegate_core_recorder!(LruMetrics);

impl LruMetricsRecorder for LruMetrics {
    fn record_pop_lru_call(&mut self) {
        self.pop_lru_calls += 1;
    }

    fn record_pop_lru_found(&mut self) {
        self.pop_lru_found += 1;
    }

    fn record_touch_call(&mut self) {
        self.touch_calls += 1;
    }

    fn record_touch_found(&mut self) {
        self.touch_found += 1;
    }
}

#[derive(Debug, Default, Clone)]
pub struct MidpointMetrics {
    pub core: CoreMetrics,
    pub old_to_new_promotions: u64,
    pub boundary_shifts: u64,
    pub old_evictions: u64,
    pub new_evictions: u64,
}

impl MidpointMetrics {
    pub fn core_snapshot(&self) -> CoreMetricsSnapshot {
        self.core.snapshot()
    }
}

delegate_core_recorder!(MidpointMetrics);

impl MidpointMetricsRecorder for MidpointMetrics {
    fn record_old_to_new_promotion(&mut self) {
        self.old_to_new_promotions += 1;
    }

    fn record_boundary_shift(&mut self) {
        self.boundary_shifts += 1;
    }

    fn record_old_eviction(&mut self) {
        self.old_evictions += 1;
    }

    fn record_new_eviction(&mut self) {
        self.new_evictions += 1;
    }
}
