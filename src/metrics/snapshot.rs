/// Counters shared by every policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoreMetricsSnapshot {
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

impl CoreMetricsSnapshot {
    /// Fraction of `get` calls that hit; `0.0` before the first call.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LruMetricsSnapshot {
    pub core: CoreMetricsSnapshot,

    pub pop_lru_calls: u64,
    pub pop_lru_found: u64,
    pub touch_calls: u64,
    pub touch_found: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

impl LruMetricsSnapshot {
    pub fn hit_rate(&self) -> f64 {
        self.core.hit_rate()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MidpointMetricsSnapshot {
    pub core: CoreMetricsSnapshot,

    pub old_to_new_promotions: u64,
    pub boundary_shifts: u64,
    pub old_evictions: u64,
    pub new_evictions: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub old_len: usize,
    pub max_old_len: usize,
    pub capacity: usize,
}

impl MidpointMetricsSnapshot {
    pub fn hit_rate(&self) -> f64 {
        self.core.hit_rate()
    }

    /// Share of evictions that came out of the new region. High values mean
    /// the old region was empty when misses arrived.
    pub fn new_eviction_ratio(&self) -> f64 {
        let total = self.old_evictions + self.new_evictions;
        if total == 0 {
            0.0
        } else {
            self.new_evictions as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_handles_zero_calls() {
        assert_eq!(CoreMetricsSnapshot::default().hit_rate(), 0.0);
        assert_eq!(LruMetricsSnapshot::default().hit_rate(), 0.0);
    }

    #[test]
    fn hit_rate_divides_hits_by_calls() {
        let core = CoreMetricsSnapshot {
            get_calls: 4,
            get_hits: 3,
            get_misses: 1,
            ..Default::default()
        };
        let snap = MidpointMetricsSnapshot {
            core,
            ..Default::default()
        };
        assert_eq!(snap.hit_rate(), 0.75);
    }

    #[test]
    fn new_eviction_ratio() {
        let snap = MidpointMetricsSnapshot {
            old_evictions: 3,
            new_evictions: 1,
            ..Default::default()
        };
        assert_eq!(snap.new_eviction_ratio(), 0.25);
        assert_eq!(MidpointMetricsSnapshot::default().new_eviction_ratio(), 0.0);
    }
}
