//! # Concurrent map with optional insertion order
//!
//! [`SafeMap`] is a key/value map guarded by a single `parking_lot::RwLock`.
//! On top of plain load/store it offers compound operations that read and
//! write under one lock acquisition (`load_or_store`, `swap`,
//! `load_and_delete`), in-place accumulation (`add`, `sub`), and range
//! queries over keys.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                         SafeMap<K, V>                        │
//!   │                                                              │
//!   │   ┌──────────────────────────────────────────────────────┐   │
//!   │   │              RwLock<MapCore<K, V>>                   │   │
//!   │   │                                                      │   │
//!   │   │   entries: FxHashMap<K, V>                           │   │
//!   │   │   order:   Option<KeyOrder<K>>  (insertion order)    │   │
//!   │   └──────────────────────────────────────────────────────┘   │
//!   │                                                              │
//!   │   metrics: MapMetrics   (feature = "metrics", atomics)       │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//!
//! | Shared (read) lock                           | Exclusive (write) lock                  |
//! |----------------------------------------------|-----------------------------------------|
//! | `exists`, `load`, `get_with`, `len`,         | `store`, `delete`, `load_and_delete`,   |
//! | `keys`, `entries`, `snapshot`,               | `load_or_store`, `swap`, `add`, `sub`,  |
//! | `keys_in_range`, `keys_between`, `range`,    | `range_delete`, `clear`,                |
//! | `with_shared`                                | `with_exclusive`                        |
//!
//! `range`, `range_delete` and the `with_*` closures run entirely inside the
//! lock. Calling back into the same map from the callback deadlocks; a slow
//! callback stalls every other caller.
//!
//! ## Order mode
//!
//! With [`OrderMode::InsertionOrder`], `range`, `range_delete`, `keys`,
//! `entries` and the range queries follow first-insertion order. Overwriting
//! a key keeps its position; removing and re-inserting moves it to the end.
//! Unordered maps keep no order record at all.
//!
//! ## Example
//!
//! ```
//! use safemap::map::{SafeMap, Visit};
//!
//! let map: SafeMap<u32, i64> = SafeMap::new_ordered();
//! map.store(1, 10);
//! map.store(2, 20);
//! map.store(3, 30);
//!
//! map.add(1, 5);
//! assert_eq!(map.load(&1), Some(15));
//!
//! assert_eq!(map.load_or_store(2, 99), (20, true));
//! assert_eq!(map.swap(4, 40), None);
//!
//! map.range_delete(|_, v| if *v >= 30 { Visit::Delete } else { Visit::Continue });
//! assert_eq!(map.keys(), vec![1, 2]);
//! assert_eq!(map.keys_in_range(2..), vec![2]);
//! ```

mod core;

use std::fmt;
use std::hash::Hash;
use std::ops::RangeBounds;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::arith::{Accumulate, Deduct};
use crate::builder::{OrderMode, SafeMapBuilder};
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::MapMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::MapMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::MetricsSnapshotProvider;

pub use self::core::{Iter, MapCore, Visit};

/// Thread-safe map with optional insertion-order iteration.
///
/// Share it between threads with `Arc<SafeMap<K, V>>`.
pub struct SafeMap<K, V> {
    inner: RwLock<MapCore<K, V>>,
    #[cfg(feature = "metrics")]
    metrics: MapMetrics,
}

impl<K, V> SafeMap<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    /// Creates an unordered map.
    ///
    /// # Example
    ///
    /// ```
    /// use safemap::map::SafeMap;
    ///
    /// let map: SafeMap<u64, String> = SafeMap::new();
    /// assert!(map.is_empty());
    /// assert!(!map.is_ordered());
    /// ```
    pub fn new() -> Self {
        Self::with_mode(OrderMode::Unordered)
    }

    /// Creates a map that iterates in insertion order.
    pub fn new_ordered() -> Self {
        Self::with_mode(OrderMode::InsertionOrder)
    }

    /// Creates a map in the given order mode.
    ///
    /// `OrderMode` converts from `bool`, so `SafeMap::with_mode(true.into())`
    /// builds an ordered map.
    pub fn with_mode(mode: OrderMode) -> Self {
        Self::with_capacity(mode, 0)
    }

    /// Creates a map with storage pre-sized for `capacity` entries.
    pub fn with_capacity(mode: OrderMode, capacity: usize) -> Self {
        Self::from_core(MapCore::with_capacity(mode, capacity))
    }

    /// Returns a builder.
    pub fn builder() -> SafeMapBuilder {
        SafeMapBuilder::new()
    }

    fn from_core(core: MapCore<K, V>) -> Self {
        Self {
            inner: RwLock::new(core),
            #[cfg(feature = "metrics")]
            metrics: MapMetrics::default(),
        }
    }

    /// Returns the order mode chosen at construction.
    pub fn mode(&self) -> OrderMode {
        self.inner.read().mode()
    }

    /// Returns `true` if iteration follows insertion order.
    pub fn is_ordered(&self) -> bool {
        self.inner.read().is_ordered()
    }

    /// Returns `true` if `key` is present.
    pub fn exists(&self, key: &K) -> bool {
        self.inner.read().exists(key)
    }

    /// Returns a clone of the value at `key`.
    ///
    /// # Example
    ///
    /// ```
    /// use safemap::map::SafeMap;
    ///
    /// let map = SafeMap::new();
    /// map.store("k", 1);
    /// assert_eq!(map.load(&"k"), Some(1));
    /// assert_eq!(map.load(&"missing"), None);
    /// ```
    pub fn load(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let value = self.inner.read().get(key).cloned();
        self.record_load(value.is_some());
        value
    }

    /// Runs `f` on the value at `key` without cloning it.
    ///
    /// `f` runs under the shared lock and must not call back into this map.
    ///
    /// # Example
    ///
    /// ```
    /// use safemap::map::SafeMap;
    ///
    /// let map = SafeMap::new();
    /// map.store(1, vec![0u8; 1024]);
    /// assert_eq!(map.get_with(&1, Vec::len), Some(1024));
    /// assert_eq!(map.get_with(&2, Vec::len), None);
    /// ```
    pub fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        let core = self.inner.read();
        let value = core.get(key);
        self.record_load(value.is_some());
        value.map(f)
    }

    /// Inserts or overwrites. A new key goes to the end of the insertion
    /// order; an existing key keeps its position.
    pub fn store(&self, key: K, value: V) {
        let previous = self.inner.write().store(key, value);
        self.record_write(previous.is_none());
    }

    /// Removes `key` if present.
    pub fn delete(&self, key: &K) {
        let removed = self.inner.write().remove(key);
        self.record_removes(usize::from(removed.is_some()));
    }

    /// Removes `key` and returns its value in one step.
    ///
    /// # Example
    ///
    /// ```
    /// use safemap::map::SafeMap;
    ///
    /// let map = SafeMap::new();
    /// map.store(1, "job");
    /// assert_eq!(map.load_and_delete(&1), Some("job"));
    /// assert_eq!(map.load_and_delete(&1), None);
    /// ```
    pub fn load_and_delete(&self, key: &K) -> Option<V> {
        let removed = self.inner.write().remove(key);
        self.record_removes(usize::from(removed.is_some()));
        removed
    }

    /// Returns `(existing, true)` if `key` is present, otherwise stores
    /// `value` and returns `(value, false)`.
    ///
    /// # Example
    ///
    /// ```
    /// use safemap::map::SafeMap;
    ///
    /// let map = SafeMap::new();
    /// assert_eq!(map.load_or_store("a", 1), (1, false));
    /// assert_eq!(map.load_or_store("a", 2), (1, true));
    /// ```
    pub fn load_or_store(&self, key: K, value: V) -> (V, bool)
    where
        V: Clone,
    {
        let (actual, loaded) = {
            let mut core = self.inner.write();
            let (actual, loaded) = core.load_or_store(key, value);
            (actual.clone(), loaded)
        };
        if !loaded {
            self.record_write(true);
        }
        (actual, loaded)
    }

    /// Stores `value` and returns the value it replaced, if any.
    ///
    /// A new key is appended to the insertion order like [`store`](Self::store).
    pub fn swap(&self, key: K, value: V) -> Option<V> {
        let previous = self.inner.write().swap(key, value);
        self.record_write(previous.is_none());
        previous
    }

    /// Adds `delta` to the value at `key`. An absent key starts from
    /// `V::default()` and is inserted like [`store`](Self::store) would.
    ///
    /// Integers wrap on overflow; `String` values are concatenated.
    ///
    /// # Example
    ///
    /// ```
    /// use safemap::map::SafeMap;
    ///
    /// let hits: SafeMap<&str, u64> = SafeMap::new();
    /// hits.add("home", 1);
    /// hits.add("home", 1);
    /// assert_eq!(hits.load(&"home"), Some(2));
    ///
    /// let log: SafeMap<u8, String> = SafeMap::new();
    /// log.add(1, "a".to_string());
    /// log.add(1, "b".to_string());
    /// assert_eq!(log.load(&1).as_deref(), Some("ab"));
    /// ```
    pub fn add(&self, key: K, delta: V)
    where
        V: Accumulate + Default,
    {
        let mut core = self.inner.write();
        let inserted = !core.exists(&key);
        core.add(key, delta);
        drop(core);
        self.record_write(inserted);
    }

    /// Subtracts `delta` from the value at `key`. An absent key starts from
    /// `V::default()` and is inserted like [`store`](Self::store) would.
    pub fn sub(&self, key: K, delta: V)
    where
        V: Deduct + Default,
    {
        let mut core = self.inner.write();
        let inserted = !core.exists(&key);
        core.sub(key, delta);
        drop(core);
        self.record_write(inserted);
    }

    /// Calls `f` for each entry under the shared lock, stopping the first
    /// time it returns `false`.
    ///
    /// `f` must not call back into this map.
    pub fn range<F>(&self, f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.inner.read().range(f);
    }

    /// Visits entries under the exclusive lock and removes those for which
    /// `f` returns [`Visit::Delete`]. [`Visit::Stop`] ends the pass.
    ///
    /// Returns the number of removed entries. `f` must not call back into
    /// this map.
    ///
    /// # Example
    ///
    /// ```
    /// use safemap::map::{SafeMap, Visit};
    ///
    /// let map = SafeMap::new_ordered();
    /// map.store(1, "a");
    /// map.store(2, "b");
    /// map.store(3, "c");
    ///
    /// let removed = map.range_delete(|k, _| {
    ///     if *k == 2 { Visit::Delete } else { Visit::Continue }
    /// });
    /// assert_eq!(removed, 1);
    /// assert!(!map.exists(&2));
    /// assert_eq!(map.keys(), vec![1, 3]);
    /// ```
    pub fn range_delete<F>(&self, f: F) -> usize
    where
        F: FnMut(&K, &V) -> Visit,
    {
        let removed = self.inner.write().range_delete(f);
        self.record_removes(removed);
        removed
    }

    /// Removes every entry and resets the insertion order.
    pub fn clear(&self) {
        self.inner.write().clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns all keys, in insertion order for ordered maps.
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().keys()
    }

    /// Returns cloned `(key, value)` pairs in iteration order.
    pub fn entries(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.inner.read().entries()
    }

    /// Returns an independent copy of the key/value mapping.
    ///
    /// With the `metrics` feature, `SafeMap` also implements
    /// `MetricsSnapshotProvider::snapshot`, which returns the operation
    /// counters. Method-call syntax always resolves to this data copy; reach
    /// the counters through `metrics()` or the fully qualified trait call.
    pub fn snapshot(&self) -> FxHashMap<K, V>
    where
        V: Clone,
    {
        self.inner.read().snapshot()
    }

    /// Returns keys inside `range`, in iteration order.
    ///
    /// # Example
    ///
    /// ```
    /// use safemap::map::SafeMap;
    ///
    /// let map = SafeMap::new_ordered();
    /// for k in [0u32, 1, 2, 3] {
    ///     map.store(k, ());
    /// }
    /// assert_eq!(map.keys_in_range(1..3), vec![1, 2]);
    /// assert_eq!(map.keys_in_range(..1), vec![0]);
    /// ```
    pub fn keys_in_range<R>(&self, range: R) -> Vec<K>
    where
        R: RangeBounds<K>,
    {
        self.inner.read().keys_in_range(range)
    }

    /// Returns keys in `[from, to)` where `K::default()` on either side means
    /// "no bound" (see [`MapCore::keys_between`]).
    ///
    /// # Example
    ///
    /// ```
    /// use safemap::map::SafeMap;
    ///
    /// let map = SafeMap::new_ordered();
    /// for k in 1..=3u64 {
    ///     map.store(k, ());
    /// }
    /// assert_eq!(map.keys_between(1, 3), vec![1, 2]);
    /// assert_eq!(map.keys_between(0, 0), vec![1, 2, 3]);
    /// ```
    pub fn keys_between(&self, from: K, to: K) -> Vec<K>
    where
        K: Default,
    {
        self.inner.read().keys_between(from, to)
    }

    /// Runs `f` with exclusive access to the core, so several operations
    /// apply as one atomic step.
    ///
    /// `f` receives the unlocked core; it must not touch this `SafeMap`.
    /// Operations made through the core are not counted in metrics.
    ///
    /// # Example
    ///
    /// ```
    /// use safemap::map::SafeMap;
    ///
    /// let accounts: SafeMap<&str, i64> = SafeMap::new();
    /// accounts.store("alice", 100);
    ///
    /// // Move funds only if the balance covers it.
    /// let moved = accounts.with_exclusive(|core| {
    ///     if core.get(&"alice").copied().unwrap_or(0) < 30 {
    ///         return false;
    ///     }
    ///     core.sub("alice", 30);
    ///     core.add("bob", 30);
    ///     true
    /// });
    /// assert!(moved);
    /// assert_eq!(accounts.load(&"bob"), Some(30));
    /// ```
    pub fn with_exclusive<R>(&self, f: impl FnOnce(&mut MapCore<K, V>) -> R) -> R {
        let mut core = self.inner.write();
        f(&mut core)
    }

    /// Runs `f` with shared access to the core.
    ///
    /// Other readers proceed concurrently; writers wait until `f` returns.
    pub fn with_shared<R>(&self, f: impl FnOnce(&MapCore<K, V>) -> R) -> R {
        let core = self.inner.read();
        f(&core)
    }

    /// Verifies that storage and the insertion-order record agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError>
    where
        K: fmt::Debug,
    {
        self.inner.read().check_invariants()
    }

    /// Consumes the map and returns its core.
    pub fn into_inner(self) -> MapCore<K, V> {
        self.inner.into_inner()
    }

    /// Returns a snapshot of the operation counters.
    #[cfg(feature = "metrics")]
    pub fn metrics(&self) -> MapMetricsSnapshot {
        let len = self.len();
        self.metrics.snapshot(len)
    }

    /// Zeroes the operation counters.
    #[cfg(feature = "metrics")]
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    #[inline]
    fn record_load(&self, hit: bool) {
        #[cfg(feature = "metrics")]
        self.metrics.record_load(hit);
        #[cfg(not(feature = "metrics"))]
        let _ = hit;
    }

    #[inline]
    fn record_write(&self, inserted: bool) {
        #[cfg(feature = "metrics")]
        self.metrics.record_write(inserted);
        #[cfg(not(feature = "metrics"))]
        let _ = inserted;
    }

    #[inline]
    fn record_removes(&self, count: usize) {
        #[cfg(feature = "metrics")]
        self.metrics.record_removes(count as u64);
        #[cfg(not(feature = "metrics"))]
        let _ = count;
    }
}

impl<K, V> Default for SafeMap<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    /// Creates an unordered map.
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<MapCore<K, V>> for SafeMap<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    fn from(core: MapCore<K, V>) -> Self {
        Self::from_core(core)
    }
}

impl<K, V> fmt::Debug for SafeMap<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.read();
        f.debug_struct("SafeMap")
            .field("len", &core.len())
            .field("mode", &core.mode())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<MapMetricsSnapshot> for SafeMap<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    fn snapshot(&self) -> MapMetricsSnapshot {
        self.metrics()
    }
}
