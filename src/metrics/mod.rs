//! Operation counters for [`SafeMap`](crate::map::SafeMap).
//!
//! Enabled with the `metrics` feature. Recording lives in
//! [`metrics_impl::MapMetrics`] (atomics, safe to bump under a shared lock),
//! reading in [`snapshot::MapMetricsSnapshot`], and publishing through
//! [`traits::MetricsExporter`] implementations such as
//! [`exporter::PrometheusTextExporter`].

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
