/// Point-in-time copy of a map's counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MapMetricsSnapshot {
    pub load_hits: u64,
    pub load_misses: u64,

    pub inserts: u64, // new keys, on any insertion path
    pub updates: u64, // overwrites of an existing key
    pub removes: u64, // keys removed one at a time or by range_delete

    pub clears: u64,

    // gauge captured at snapshot time
    pub len: usize,
}

impl MapMetricsSnapshot {
    /// Fraction of lookups that found their key, or `0.0` with no lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.load_hits + self.load_misses;
        if total == 0 {
            0.0
        } else {
            self.load_hits as f64 / total as f64
        }
    }
}
