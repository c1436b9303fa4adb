//! Construction-time configuration for [`SafeMap`].
//!
//! The order mode is fixed for the lifetime of a map. A capacity hint only
//! pre-sizes the hash index (and the order record in insertion-order mode);
//! it never bounds the number of entries.
//!
//! ## Example
//!
//! ```rust
//! use safemap::builder::{OrderMode, SafeMapBuilder};
//!
//! let map = SafeMapBuilder::new()
//!     .mode(OrderMode::InsertionOrder)
//!     .capacity(128)
//!     .build::<u64, String>();
//! map.store(2, "second".to_string());
//! map.store(1, "first".to_string());
//! assert_eq!(map.keys(), vec![2, 1]);
//! ```

use std::hash::Hash;

use crate::map::SafeMap;

/// Whether iteration follows first-insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderMode {
    /// Iteration order is unspecified; no order record is kept.
    #[default]
    Unordered,
    /// `range`, `keys`, `entries` and the range queries follow the order in
    /// which keys were first inserted.
    InsertionOrder,
}

impl OrderMode {
    /// Returns `true` for [`OrderMode::InsertionOrder`].
    pub fn is_ordered(self) -> bool {
        matches!(self, OrderMode::InsertionOrder)
    }
}

impl From<bool> for OrderMode {
    /// `true` selects insertion order.
    fn from(ordered: bool) -> Self {
        if ordered {
            OrderMode::InsertionOrder
        } else {
            OrderMode::Unordered
        }
    }
}

/// Builder for [`SafeMap`] instances.
#[derive(Debug, Clone, Default)]
pub struct SafeMapBuilder {
    mode: OrderMode,
    capacity: usize,
}

impl SafeMapBuilder {
    /// Starts from an unordered map with no pre-sized storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order mode.
    pub fn mode(mut self, mode: OrderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `mode(OrderMode::from(ordered))`.
    pub fn ordered(self, ordered: bool) -> Self {
        self.mode(OrderMode::from(ordered))
    }

    /// Pre-sizes storage for `capacity` entries.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds the map.
    ///
    /// # Type Parameters
    ///
    /// - `K`: key type, must be `Eq + Hash + Ord + Clone`
    /// - `V`: value type, unconstrained
    pub fn build<K, V>(self) -> SafeMap<K, V>
    where
        K: Eq + Hash + Ord + Clone,
    {
        tracing::debug!(
            mode = ?self.mode,
            capacity = self.capacity,
            "building safemap"
        );
        SafeMap::with_capacity(self.mode, self.capacity)
    }
}
