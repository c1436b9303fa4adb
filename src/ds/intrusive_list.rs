//! Arena-backed doubly linked sequence.
//!
//! Holds the key sequence of [`KeyOrder`](crate::ds::key_order::KeyOrder).
//! Each element sits in a [`SlotArena`] slot and points at its neighbours by
//! [`SlotId`]. Appending and unlinking are O(1), and an id held by a caller
//! stops resolving as soon as its element is removed (the arena bumps the
//! slot generation).
//!
//! ```text
//!   push_back(a), push_back(b), push_back(c), remove(b):
//!
//!   head                                tail
//!    │                                   │
//!    ▼                                   ▼
//!   [a]  ──next──►  (b: unlinked)  ──►  [c]
//!   [a]  ◄──────────────prev──────────  [c]
//! ```
//!
//! ## Walking while removing
//!
//! `front_id` and `next_id` form a cursor. Read the successor before removing
//! the element under the cursor:
//!
//! ```
//! use safemap::ds::IntrusiveList;
//!
//! let mut seq = IntrusiveList::new();
//! for n in 1..=5 {
//!     seq.push_back(n);
//! }
//! let mut cursor = seq.front_id();
//! while let Some(id) = cursor {
//!     cursor = seq.next_id(id);
//!     if seq.get(id).is_some_and(|n| n % 2 == 1) {
//!         seq.remove(id);
//!     }
//! }
//! assert_eq!(seq.iter().copied().collect::<Vec<_>>(), vec![2, 4]);
//! ```

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Link<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Doubly linked sequence stored in a [`SlotArena`].
#[derive(Debug)]
pub struct IntrusiveList<T> {
    slots: SlotArena<Link<T>>,
    first: Option<SlotId>,
    last: Option<SlotId>,
}

impl<T> IntrusiveList<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotArena::with_capacity(capacity),
            first: None,
            last: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Id of the oldest element.
    #[inline]
    pub fn front_id(&self) -> Option<SlotId> {
        self.first
    }

    /// Successor of `id`. `None` at the end of the sequence or once `id`
    /// has been removed.
    pub fn next_id(&self, id: SlotId) -> Option<SlotId> {
        self.slots.get(id)?.next
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id).map(|link| &link.value)
    }

    /// Values from oldest to newest.
    pub fn iter(&self) -> IntrusiveListIter<'_, T> {
        IntrusiveListIter {
            entries: self.iter_entries(),
        }
    }

    /// `(id, value)` pairs from oldest to newest.
    pub fn iter_entries(&self) -> IntrusiveListEntryIter<'_, T> {
        IntrusiveListEntryIter {
            slots: &self.slots,
            cursor: self.first,
            left: self.len(),
        }
    }

    /// Appends `value` and returns its id.
    pub fn push_back(&mut self, value: T) -> SlotId {
        let prev = self.last;
        let id = self.slots.insert(Link {
            value,
            prev,
            next: None,
        });
        match prev.and_then(|p| self.slots.get_mut(p)) {
            Some(link) => link.next = Some(id),
            None => self.first = Some(id),
        }
        self.last = Some(id);
        id
    }

    /// Unlinks `id` and returns its value. Stale ids return `None`.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let Link { value, prev, next } = self.slots.remove(id)?;
        match prev.and_then(|p| self.slots.get_mut(p)) {
            Some(link) => link.next = next,
            None => self.first = next,
        }
        match next.and_then(|n| self.slots.get_mut(n)) {
            Some(link) => link.prev = prev,
            None => self.last = prev,
        }
        Some(value)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.first = None;
        self.last = None;
    }

    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    /// First inconsistency between the links and the arena, if any.
    pub(crate) fn link_violation(&self) -> Option<String> {
        let len = self.len();
        if len == 0 {
            return match (self.first, self.last) {
                (None, None) => None,
                (first, last) => Some(format!(
                    "empty sequence still has ends: first={:?} last={:?}",
                    first, last
                )),
            };
        }

        let mut expected_prev = None;
        let mut cursor = self.first;
        let mut walked = 0usize;
        while let Some(id) = cursor {
            let Some(link) = self.slots.get(id) else {
                return Some(format!("link points at vacant slot {:?}", id));
            };
            if link.prev != expected_prev {
                return Some(format!(
                    "{:?} links back to {:?} instead of {:?}",
                    id, link.prev, expected_prev
                ));
            }
            walked += 1;
            if walked > len {
                return Some(format!("links loop after {} elements", walked));
            }
            expected_prev = Some(id);
            cursor = link.next;
        }

        if expected_prev != self.last {
            return Some(format!(
                "walk ended at {:?} but last is {:?}",
                expected_prev, self.last
            ));
        }
        if walked != len {
            return Some(format!("walked {} elements, arena holds {}", walked, len));
        }
        None
    }

    /// Panics on the first link inconsistency.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Some(violation) = self.link_violation() {
            panic!("sequence links corrupted: {}", violation);
        }
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowing iterator over `(SlotId, &T)`, oldest first.
pub struct IntrusiveListEntryIter<'a, T> {
    slots: &'a SlotArena<Link<T>>,
    cursor: Option<SlotId>,
    left: usize,
}

impl<'a, T> Iterator for IntrusiveListEntryIter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let link = self.slots.get(id)?;
        self.cursor = link.next;
        self.left = self.left.saturating_sub(1);
        Some((id, &link.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.left, Some(self.left))
    }
}

/// Borrowing iterator over `&T`, oldest first.
pub struct IntrusiveListIter<'a, T> {
    entries: IntrusiveListEntryIter<'a, T>,
}

impl<'a, T> Iterator for IntrusiveListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<T: Copy>(seq: &IntrusiveList<T>) -> Vec<T> {
        seq.iter().copied().collect()
    }

    #[test]
    fn appends_in_order() {
        let mut seq = IntrusiveList::new();
        for key in ["x", "y", "z"] {
            seq.push_back(key);
        }
        assert_eq!(values(&seq), vec!["x", "y", "z"]);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.iter().size_hint(), (3, Some(3)));
        seq.debug_validate_invariants();
    }

    #[test]
    fn unlinking_each_position_repairs_ends() {
        let mut seq = IntrusiveList::new();
        let first = seq.push_back(10);
        let middle = seq.push_back(20);
        let last = seq.push_back(30);
        let extra = seq.push_back(40);

        assert_eq!(seq.remove(middle), Some(20));
        assert_eq!(values(&seq), vec![10, 30, 40]);
        seq.debug_validate_invariants();

        assert_eq!(seq.remove(first), Some(10));
        assert_eq!(seq.front_id(), Some(last));
        seq.debug_validate_invariants();

        assert_eq!(seq.remove(extra), Some(40));
        assert_eq!(values(&seq), vec![30]);
        assert_eq!(seq.next_id(last), None);
        seq.debug_validate_invariants();

        assert_eq!(seq.remove(last), Some(30));
        assert!(seq.is_empty());
        assert_eq!(seq.front_id(), None);
        assert!(seq.link_violation().is_none());
    }

    #[test]
    fn stale_id_does_not_resolve_after_slot_reuse() {
        let mut seq = IntrusiveList::new();
        let old = seq.push_back('a');
        seq.push_back('b');
        assert_eq!(seq.remove(old), Some('a'));

        let fresh = seq.push_back('c');
        assert_eq!(seq.get(old), None);
        assert_eq!(seq.next_id(old), None);
        assert_eq!(seq.remove(old), None);
        assert_eq!(seq.get(fresh), Some(&'c'));
        assert_eq!(values(&seq), vec!['b', 'c']);
    }

    #[test]
    fn cursor_walk_removes_every_other_element() {
        let mut seq = IntrusiveList::new();
        for n in 0..8 {
            seq.push_back(n);
        }

        let mut cursor = seq.front_id();
        let mut seen = 0;
        while let Some(id) = cursor {
            cursor = seq.next_id(id);
            seen += 1;
            if seq.get(id).is_some_and(|n| n % 2 == 0) {
                seq.remove(id);
            }
        }

        assert_eq!(seen, 8);
        assert_eq!(values(&seq), vec![1, 3, 5, 7]);
        seq.debug_validate_invariants();
    }

    #[test]
    fn entries_pair_ids_with_values() {
        let mut seq = IntrusiveList::new();
        let ids: Vec<SlotId> = (0..3u8).map(|n| seq.push_back(n)).collect();
        let entries: Vec<(SlotId, u8)> = seq.iter_entries().map(|(id, n)| (id, *n)).collect();
        assert_eq!(entries, vec![(ids[0], 0), (ids[1], 1), (ids[2], 2)]);
    }

    #[test]
    fn clear_then_reuse() {
        let mut seq = IntrusiveList::with_capacity(4);
        seq.push_back(1);
        seq.push_back(2);
        seq.clear();
        assert!(seq.is_empty());
        assert_eq!(seq.front_id(), None);
        assert!(seq.link_violation().is_none());

        seq.reserve(16);
        seq.push_back(3);
        assert_eq!(values(&seq), vec![3]);
        seq.debug_validate_invariants();
    }

    #[test]
    fn corrupted_back_link_is_reported() {
        let mut seq = IntrusiveList::new();
        let a = seq.push_back(1);
        let b = seq.push_back(2);
        if let Some(link) = seq.slots.get_mut(b) {
            link.prev = None;
        }
        let violation = seq.link_violation().unwrap();
        assert!(violation.contains("links back to"));
        assert!(violation.contains(&format!("{:?}", a)));
    }
}
