use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::metrics::snapshot::{CoreMetricsSnapshot, LruMetricsSnapshot, MidpointMetricsSnapshot};
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// Writes the text exposition format so the output can be scraped directly or
/// forwarded to a collector. Write errors are dropped; metrics export never
/// fails a caller.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send + Sync> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send + Sync> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_metric(&self, kind: &str, name: &str, value: u64) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, name: &str, value: u64) {
        self.write_metric("counter", name, value);
    }

    fn write_gauge(&self, name: &str, value: u64) {
        self.write_metric("gauge", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }

    fn export_core(&self, core: &CoreMetricsSnapshot) {
        self.write_counter(&self.metric_name("get_calls_total"), core.get_calls);
        self.write_counter(&self.metric_name("get_hits_total"), core.get_hits);
        self.write_counter(&self.metric_name("get_misses_total"), core.get_misses);
        self.write_counter(&self.metric_name("insert_calls_total"), core.insert_calls);
        self.write_counter(
            &self.metric_name("insert_updates_total"),
            core.insert_updates,
        );
        self.write_counter(&self.metric_name("insert_new_total"), core.insert_new);
        self.write_counter(&self.metric_name("evict_calls_total"), core.evict_calls);
        self.write_counter(
            &self.metric_name("evicted_entries_total"),
            core.evicted_entries,
        );
        self.write_counter(&self.metric_name("clear_calls_total"), core.clear_calls);
    }
}

impl<W: Write + Send + Sync> MetricsExporter<LruMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &LruMetricsSnapshot) {
        self.export_core(&snapshot.core);
        self.write_counter(
            &self.metric_name("pop_lru_calls_total"),
            snapshot.pop_lru_calls,
        );
        self.write_counter(
            &self.metric_name("pop_lru_found_total"),
            snapshot.pop_lru_found,
        );
        self.write_counter(&self.metric_name("touch_calls_total"), snapshot.touch_calls);
        self.write_counter(&self.metric_name("touch_found_total"), snapshot.touch_found);
        self.write_gauge(&self.metric_name("cache_len"), snapshot.cache_len as u64);
        self.write_gauge(&self.metric_name("capacity"), snapshot.capacity as u64);
    }
}

impl<W: Write + Send + Sync> MetricsExporter<MidpointMetricsSnapshot>
    for PrometheusTextExporter<W>
{
    fn export(&self, snapshot: &MidpointMetricsSnapshot) {
        self.export_core(&snapshot.core);
        self.write_counter(
            &self.metric_name("old_to_new_promotions_total"),
            snapshot.old_to_new_promotions,
        );
        self.write_counter(
            &self.metric_name("boundary_shifts_total"),
            snapshot.boundary_shifts,
        );
        self.write_counter(
            &self.metric_name("old_evictions_total"),
            snapshot.old_evictions,
        );
        self.write_counter(
            &self.metric_name("new_evictions_total"),
            snapshot.new_evictions,
        );
        self.write_gauge(&self.metric_name("cache_len"), snapshot.cache_len as u64);
        self.write_gauge(&self.metric_name("old_len"), snapshot.old_len as u64);
        self.write_gauge(
            &self.metric_name("max_old_len"),
            snapshot.max_old_len as u64,
        );
        self.write_gauge(&self.metric_name("capacity"), snapshot.capacity as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<S>(prefix: &str, snapshot: &S) -> String
    where
        PrometheusTextExporter<Vec<u8>>: MetricsExporter<S>,
    {
        let exporter = PrometheusTextExporter::new(prefix, Vec::new());
        exporter.export(snapshot);
        String::from_utf8(exporter.into_inner()).unwrap()
    }

    #[test]
    fn midpoint_snapshot_renders_counters_and_gauges() {
        let snap = MidpointMetricsSnapshot {
            core: CoreMetricsSnapshot {
                get_calls: 5,
                get_hits: 4,
                get_misses: 1,
                ..Default::default()
            },
            boundary_shifts: 2,
            old_len: 3,
            max_old_len: 3,
            capacity: 8,
            ..Default::default()
        };
        let text = render("buffer_pool", &snap);
        assert!(text.contains("# TYPE buffer_pool_get_hits_total counter\nbuffer_pool_get_hits_total 4\n"));
        assert!(text.contains("buffer_pool_boundary_shifts_total 2\n"));
        assert!(text.contains("# TYPE buffer_pool_old_len gauge\nbuffer_pool_old_len 3\n"));
        assert!(text.contains("buffer_pool_capacity 8\n"));
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let snap = LruMetricsSnapshot {
            touch_calls: 7,
            ..Default::default()
        };
        let text = render("", &snap);
        assert!(text.contains("\ntouch_calls_total 7\n"));
        assert!(text.starts_with("# TYPE get_calls_total counter\n"));
    }
}
