//! Single-threaded map core: value storage plus an optional insertion-order
//! record.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                          MapCore<K, V>                           │
//!   │                                                                  │
//!   │   entries: FxHashMap<K, V>          (authoritative storage)      │
//!   │                                                                  │
//!   │   order:   Option<KeyOrder<K>>      (Some only in insertion-     │
//!   │            ┌───────────────────┐     order mode)                 │
//!   │            │ index: K ─► SlotId│                                 │
//!   │            │ list:  k1 ◄► k2 ◄► k3 (first-insertion order)       │
//!   │            └───────────────────┘                                 │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every path that creates a key (`store`, `swap`, `load_or_store`, `add`,
//! `sub`) registers it in the order record, and every path that drops a key
//! (`remove`, `range_delete`, `clear`) unregisters it, so the key set of the
//! order record always equals the key set of `entries`.
//!
//! `MapCore` has no locking. [`SafeMap`](crate::map::SafeMap) wraps it in a
//! `parking_lot::RwLock`; callers that need several operations to happen
//! atomically reach it through `SafeMap::with_exclusive`.

use std::collections::hash_map::{self, Entry};
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Bound, RangeBounds};

use rustc_hash::FxHashMap;

use crate::arith::{Accumulate, Deduct};
use crate::builder::OrderMode;
use crate::ds::intrusive_list::IntrusiveListIter;
use crate::ds::key_order::KeyOrder;
use crate::error::InvariantError;

/// Outcome of a `range_delete` visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visit {
    /// End the pass. Remaining entries are neither visited nor deleted.
    Stop,
    /// Keep the entry and move on.
    Continue,
    /// Remove the entry and move on.
    Delete,
}

/// Map storage with optional insertion-order tracking.
#[derive(Debug)]
pub struct MapCore<K, V> {
    entries: FxHashMap<K, V>,
    order: Option<KeyOrder<K>>,
}

impl<K, V> MapCore<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    /// Creates an empty core in the given mode.
    pub fn new(mode: OrderMode) -> Self {
        Self::with_capacity(mode, 0)
    }

    /// Creates an empty core with room for `capacity` entries.
    pub fn with_capacity(mode: OrderMode, capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: mode
                .is_ordered()
                .then(|| KeyOrder::with_capacity(capacity)),
        }
    }

    #[inline]
    pub fn mode(&self) -> OrderMode {
        OrderMode::from(self.order.is_some())
    }

    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.order.is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn exists(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Mutable access to a stored value. Does not affect ordering.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Inserts or overwrites, returning the previous value.
    ///
    /// A new key is appended to the order record; an existing key keeps its
    /// position.
    pub fn store(&mut self, key: K, value: V) -> Option<V> {
        match self.entries.entry(key) {
            Entry::Occupied(mut slot) => Some(slot.insert(value)),
            Entry::Vacant(slot) => {
                if let Some(order) = self.order.as_mut() {
                    order.push(slot.key().clone());
                }
                slot.insert(value);
                None
            },
        }
    }

    /// Same as [`store`](Self::store); named for call sites that care about
    /// the previous value.
    #[inline]
    pub fn swap(&mut self, key: K, value: V) -> Option<V> {
        self.store(key, value)
    }

    /// Returns the stored value and `true`, or stores `value` and returns it
    /// with `false`.
    pub fn load_or_store(&mut self, key: K, value: V) -> (&V, bool) {
        match self.entries.entry(key) {
            Entry::Occupied(slot) => (&*slot.into_mut(), true),
            Entry::Vacant(slot) => {
                if let Some(order) = self.order.as_mut() {
                    order.push(slot.key().clone());
                }
                (&*slot.insert(value), false)
            },
        }
    }

    /// Removes `key` from storage and from the order record.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.entries.remove(key)?;
        if let Some(order) = self.order.as_mut() {
            order.remove(key);
        }
        Some(value)
    }

    /// Adds `delta` to the value at `key`, starting from `V::default()` when
    /// the key is absent. Returns the updated value.
    pub fn add(&mut self, key: K, delta: V) -> &V
    where
        V: Accumulate + Default,
    {
        let value = self.value_or_default(key);
        value.accumulate(delta);
        value
    }

    /// Subtracts `delta` from the value at `key`, starting from
    /// `V::default()` when the key is absent. Returns the updated value.
    pub fn sub(&mut self, key: K, delta: V) -> &V
    where
        V: Deduct + Default,
    {
        let value = self.value_or_default(key);
        value.deduct(delta);
        value
    }

    fn value_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        match self.entries.entry(key) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                if let Some(order) = self.order.as_mut() {
                    order.push(slot.key().clone());
                }
                slot.insert(V::default())
            },
        }
    }

    /// Calls `f` for each entry until it returns `false`.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for (key, value) in self.iter() {
            if !f(key, value) {
                return;
            }
        }
    }

    /// Visits entries and removes those for which `f` returns
    /// [`Visit::Delete`]. Returns the number of entries removed.
    ///
    /// In insertion-order mode each removal happens as soon as it is
    /// requested. In unordered mode removals are collected and applied after
    /// the pass, including when the pass ends with [`Visit::Stop`].
    pub fn range_delete<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&K, &V) -> Visit,
    {
        let mut visited = 0usize;
        let mut deleted = 0usize;
        let mut stopped = false;

        match self.order.as_mut() {
            Some(order) => {
                let mut cursor = order.front_id();
                while let Some(id) = cursor {
                    cursor = order.next_id(id);
                    let visit = match order
                        .key_at(id)
                        .and_then(|key| self.entries.get(key).map(|value| (key, value)))
                    {
                        Some((key, value)) => f(key, value),
                        None => continue,
                    };
                    visited += 1;
                    match visit {
                        Visit::Stop => {
                            stopped = true;
                            break;
                        },
                        Visit::Continue => {},
                        Visit::Delete => {
                            if let Some(key) = order.remove_at(id) {
                                self.entries.remove(&key);
                                deleted += 1;
                            }
                        },
                    }
                }
            },
            None => {
                let mut doomed = Vec::new();
                for (key, value) in &self.entries {
                    visited += 1;
                    match f(key, value) {
                        Visit::Stop => {
                            stopped = true;
                            break;
                        },
                        Visit::Continue => {},
                        Visit::Delete => doomed.push(key.clone()),
                    }
                }
                for key in &doomed {
                    if self.entries.remove(key).is_some() {
                        deleted += 1;
                    }
                }
            },
        }

        tracing::trace!(
            visited,
            deleted,
            stopped,
            ordered = self.is_ordered(),
            "range_delete pass finished"
        );
        deleted
    }

    /// Drops every entry and resets the order record.
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        if let Some(order) = self.order.as_mut() {
            order.clear();
        }
        tracing::trace!(dropped, "cleared");
    }

    /// Reserves room for `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
        if let Some(order) = self.order.as_mut() {
            order.reserve(additional);
        }
    }

    /// Iterates entries in insertion order, or in hash order when unordered.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let inner = match &self.order {
            Some(order) => IterInner::Ordered {
                keys: order.iter(),
                entries: &self.entries,
            },
            None => IterInner::Unordered(self.entries.iter()),
        };
        Iter {
            inner,
            remaining: self.entries.len(),
        }
    }

    /// Keys in iteration order. Always `len()` long.
    pub fn keys(&self) -> Vec<K> {
        self.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Cloned `(key, value)` pairs in iteration order.
    pub fn entries(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Independent copy of the key/value mapping.
    pub fn snapshot(&self) -> FxHashMap<K, V>
    where
        V: Clone,
    {
        self.entries.clone()
    }

    /// Keys inside `range`, in iteration order.
    ///
    /// ```
    /// use safemap::builder::OrderMode;
    /// use safemap::map::MapCore;
    ///
    /// let mut core = MapCore::new(OrderMode::InsertionOrder);
    /// for key in [5u32, 1, 3, 2] {
    ///     core.store(key, ());
    /// }
    /// assert_eq!(core.keys_in_range(2..5), vec![3, 2]);
    /// assert_eq!(core.keys_in_range(..=1), vec![1]);
    /// ```
    pub fn keys_in_range<R>(&self, range: R) -> Vec<K>
    where
        R: RangeBounds<K>,
    {
        self.iter()
            .filter(|(key, _)| range.contains(*key))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Half-open range query where `K::default()` on either side means
    /// "unbounded".
    ///
    /// Keys `k` with `(from == zero || k >= from) && (to == zero || k < to)`.
    /// Only meaningful for key domains whose default value is the smallest
    /// key (non-negative integers). Use [`keys_in_range`](Self::keys_in_range)
    /// when a real key may equal the default.
    pub fn keys_between(&self, from: K, to: K) -> Vec<K>
    where
        K: Default,
    {
        let zero = K::default();
        let lower = if from == zero {
            Bound::Unbounded
        } else {
            Bound::Included(from)
        };
        let upper = if to == zero {
            Bound::Unbounded
        } else {
            Bound::Excluded(to)
        };
        self.keys_in_range((lower, upper))
    }

    /// Verifies that storage and the order record agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError>
    where
        K: Debug,
    {
        let Some(order) = &self.order else {
            return Ok(());
        };

        if let Some(violation) = order.violation() {
            return Err(InvariantError::new(violation));
        }
        if order.len() != self.entries.len() {
            return Err(InvariantError::new(format!(
                "order record holds {} keys but storage holds {}",
                order.len(),
                self.entries.len()
            )));
        }
        if let Some(key) = order.iter().find(|key| !self.entries.contains_key(*key)) {
            return Err(InvariantError::new(format!(
                "key {:?} in order record but not in storage",
                key
            )));
        }
        Ok(())
    }
}

/// Iterator over `(&K, &V)` in the map's iteration order.
pub struct Iter<'a, K, V> {
    inner: IterInner<'a, K, V>,
    remaining: usize,
}

enum IterInner<'a, K, V> {
    Ordered {
        keys: IntrusiveListIter<'a, K>,
        entries: &'a FxHashMap<K, V>,
    },
    Unordered(hash_map::Iter<'a, K, V>),
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Eq + Hash,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.inner {
            IterInner::Ordered {
                ref mut keys,
                entries,
            } => keys.find_map(|key| entries.get_key_value(key)),
            IterInner::Unordered(ref mut iter) => iter.next(),
        };
        if item.is_some() {
            self.remaining = self.remaining.saturating_sub(1);
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> where K: Eq + Hash {}

impl<'a, K, V> IntoIterator for &'a MapCore<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
