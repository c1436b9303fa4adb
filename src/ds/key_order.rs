//! Insertion-order record for map keys.
//!
//! Pairs an [`IntrusiveList`] of keys (first-insertion order) with an
//! `FxHashMap<K, SlotId>` index so membership, append and removal are O(1).
//!
//! ```text
//!   index: { "b" ─► id_2, "a" ─► id_1, "c" ─► id_3 }
//!                     │            │            │
//!   list:  head ─► [id_1:"a"] ◄──► [id_2:"b"] ◄──► [id_3:"c"] ◄── tail
//! ```
//!
//! A key keeps its position until it is removed; pushing a key that is
//! already recorded does nothing. A removed key pushed again lands at the
//! tail.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::{IntrusiveList, IntrusiveListIter};
use crate::ds::slot_arena::SlotId;

#[derive(Debug)]
pub struct KeyOrder<K> {
    list: IntrusiveList<K>,
    index: FxHashMap<K, SlotId>,
}

impl<K> KeyOrder<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: IntrusiveList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Appends `key` at the tail unless it is already recorded.
    ///
    /// Returns `true` if the key was appended.
    pub fn push(&mut self, key: K) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        let id = self.list.push_back(key.clone());
        self.index.insert(key, id);
        true
    }

    /// Drops `key` from both the list and the index.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(id) => {
                self.list.remove(id);
                true
            },
            None => false,
        }
    }

    /// Position of the oldest key, for cursor traversal.
    pub fn front_id(&self) -> Option<SlotId> {
        self.list.front_id()
    }

    pub fn next_id(&self, id: SlotId) -> Option<SlotId> {
        self.list.next_id(id)
    }

    pub fn key_at(&self, id: SlotId) -> Option<&K> {
        self.list.get(id)
    }

    /// Removes the key at position `id` and hands it back.
    pub fn remove_at(&mut self, id: SlotId) -> Option<K> {
        let key = self.list.remove(id)?;
        self.index.remove(&key);
        Some(key)
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.list.reserve(additional);
        self.index.reserve(additional);
    }

    /// Keys from oldest to newest.
    pub fn iter(&self) -> IntrusiveListIter<'_, K> {
        self.list.iter()
    }

    /// Checks list links and list/index agreement, returning the first
    /// problem found.
    pub(crate) fn violation(&self) -> Option<String>
    where
        K: std::fmt::Debug,
    {
        if let Some(link) = self.list.link_violation() {
            return Some(link);
        }
        if self.index.len() != self.list.len() {
            return Some(format!(
                "order index holds {} keys but sequence holds {}",
                self.index.len(),
                self.list.len()
            ));
        }
        for (id, key) in self.list.iter_entries() {
            match self.index.get(key) {
                Some(indexed) if *indexed == id => {},
                Some(indexed) => {
                    return Some(format!(
                        "key {:?} indexed at {:?} but found at {:?}",
                        key, indexed, id
                    ));
                },
                None => return Some(format!("key {:?} in sequence but not indexed", key)),
            }
        }
        None
    }
}

impl<K> Default for KeyOrder<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
