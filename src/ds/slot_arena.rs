//! Slot storage with stable, generation-checked handles.
//!
//! Freed slots are recycled through a free list. Every slot carries a
//! generation counter that is bumped on removal, so a `SlotId` taken before a
//! removal never resolves to the value that later reuses the same index.
//!
//! ```text
//!   slots:     [ (gen 0, Some(a)) | (gen 1, None) | (gen 0, Some(c)) ]
//!   free_list: [ 1 ]
//!
//!   insert(d) ──► reuses index 1 ──► SlotId { index: 1, generation: 1 }
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: usize,
    generation: u32,
}

impl SlotId {
    pub fn index(self) -> usize {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> SlotId {
        let id = match self.free_list.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.value = Some(value);
                SlotId {
                    index,
                    generation: slot.generation,
                }
            },
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                SlotId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            },
        };
        self.len += 1;
        id
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Drops every value. Slots are kept and their generations bumped, so
    /// ids handed out before the clear stop resolving.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(index);
        }
        self.len = 0;
    }

    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_arena_insert_remove_reuse() {
        let mut arena = SlotArena::new();
        let id1 = arena.insert("a");
        let id2 = arena.insert("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(id1), Some(&"a"));
        assert_eq!(arena.get(id2), Some(&"b"));

        assert_eq!(arena.remove(id1), Some("a"));
        assert_eq!(arena.len(), 1);

        let id3 = arena.insert("c");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(id3), Some(&"c"));
        assert_eq!(id1.index(), id3.index());
        assert_ne!(id1.generation(), id3.generation());
    }

    #[test]
    fn stale_id_does_not_alias_recycled_slot() {
        let mut arena = SlotArena::new();
        let stale = arena.insert(1);
        arena.remove(stale);
        let fresh = arena.insert(2);

        assert_eq!(arena.get(stale), None);
        assert_eq!(arena.get_mut(stale), None);
        assert!(!arena.contains(stale));
        assert_eq!(arena.remove(stale), None);
        assert_eq!(arena.get(fresh), Some(&2));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn double_remove_is_a_no_op() {
        let mut arena = SlotArena::new();
        let id = arena.insert("x");
        assert_eq!(arena.remove(id), Some("x"));
        assert_eq!(arena.remove(id), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn clear_resets_len() {
        let mut arena = SlotArena::with_capacity(4);
        arena.insert(1);
        arena.insert(2);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn ids_from_before_clear_stay_dead() {
        let mut arena = SlotArena::new();
        let kept = arena.insert("a");
        let freed = arena.insert("b");
        arena.remove(freed);
        arena.clear();

        let first = arena.insert("c");
        let second = arena.insert("d");
        assert_eq!(first.index(), kept.index());
        assert_eq!(second.index(), freed.index());

        assert_eq!(arena.get(kept), None);
        assert_eq!(arena.get(freed), None);
        assert_eq!(arena.remove(kept), None);
        assert_eq!(arena.get(first), Some(&"c"));
        assert_eq!(arena.get(second), Some(&"d"));
        assert_eq!(arena.len(), 2);
    }
}
