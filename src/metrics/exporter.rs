use std::io::Write;

use parking_lot::Mutex;

use crate::metrics::snapshot::MapMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for map metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be scraped
/// directly or forwarded to a collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_metric(&self, kind: &str, name: &str, value: u64) {
        let mut writer = self.writer.lock();
        // Exporting is best-effort; a failed write must not disturb the map.
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<MapMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &MapMetricsSnapshot) {
        let counters = [
            ("load_hits_total", snapshot.load_hits),
            ("load_misses_total", snapshot.load_misses),
            ("inserts_total", snapshot.inserts),
            ("updates_total", snapshot.updates),
            ("removes_total", snapshot.removes),
            ("clears_total", snapshot.clears),
        ];
        for (suffix, value) in counters {
            self.write_metric("counter", &self.metric_name(suffix), value);
        }
        self.write_metric("gauge", &self.metric_name("len"), snapshot.len as u64);
    }
}
