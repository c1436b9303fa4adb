//! # Metrics Traits
//!
//! Recording and publishing are kept apart: the map owns its counters and
//! hands out [`MapMetricsSnapshot`](crate::metrics::snapshot::MapMetricsSnapshot)
//! values; exporters only see snapshots.
//!
//! ```text
//!   SafeMap ──record──► MapMetrics ──snapshot──► MapMetricsSnapshot
//!                                                      │
//!                                                      ▼
//!                                           MetricsExporter<S>::export
//! ```

/// Publish a metrics snapshot to a monitoring sink.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}

/// Produce a point-in-time snapshot.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
