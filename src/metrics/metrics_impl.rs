use std::sync::atomic::{AtomicU64, Ordering};

use crate::metrics::snapshot::MapMetricsSnapshot;

/// Counters for map operations.
///
/// Atomics, because loads record hits while holding only the shared lock.
#[derive(Debug, Default)]
pub struct MapMetrics {
    load_hits: AtomicU64,
    load_misses: AtomicU64,
    inserts: AtomicU64,
    updates: AtomicU64,
    removes: AtomicU64,
    clears: AtomicU64,
}

impl MapMetrics {
    /// Record a lookup outcome.
    #[inline]
    pub fn record_load(&self, hit: bool) {
        if hit {
            self.load_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.load_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a write; `inserted` is true when the key was new.
    #[inline]
    pub fn record_write(&self, inserted: bool) {
        if inserted {
            self.inserts.fetch_add(1, Ordering::Relaxed);
        } else {
            self.updates.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_removes(&self, count: u64) {
        if count > 0 {
            self.removes.fetch_add(count, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot current counters together with the live entry count.
    pub fn snapshot(&self, len: usize) -> MapMetricsSnapshot {
        MapMetricsSnapshot {
            load_hits: self.load_hits.load(Ordering::Relaxed),
            load_misses: self.load_misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
            len,
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.load_hits,
            &self.load_misses,
            &self.inserts,
            &self.updates,
            &self.removes,
            &self.clears,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
