//! Slab arena with last-in-first-out deallocation.
//!
//! Speculative parsing allocates and discards nodes in strict stack order:
//! the most recently created nodes are always the first to be thrown away
//! when an alternative fails. This arena is built around that discipline.
//! Allocation bumps a cursor inside the current slab, and deallocation may
//! only ever pop the most recent allocation.
//!
//! Slabs are fixed-capacity and are never returned to the system while the
//! arena lives. A slab that empties out stays in the chain and is reused by
//! the next allocation that overflows its predecessor, so steady-state
//! parsing does not touch the global allocator at all.

use crate::constants::DEFAULT_SLAB_CAPACITY;
use std::mem;

/// Handle to a live arena allocation.
///
/// Ids are dense and strictly increasing in allocation order, so comparing
/// two ids compares their allocation times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArenaId(u32);

impl ArenaId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One allocation plus the tag written next to it.
///
/// The tag records the allocation's id and size; `free` checks it to catch
/// out-of-order deallocation.
#[derive(Debug)]
struct Slot<T> {
    tag: Tag,
    value: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tag {
    id: ArenaId,
    size: u32,
}

/// A typed slab arena. See the [module docs](self).
#[derive(Debug)]
pub struct Arena<T> {
    slabs: Vec<Vec<Slot<T>>>,
    /// Index of the slab receiving allocations. Every slab before it is
    /// full, every slab after it is empty.
    current: usize,
    slab_capacity: usize,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// The size tag every allocation of this arena carries.
    const SLOT_SIZE: usize = mem::size_of::<Slot<T>>();

    pub fn new() -> Self {
        Self::with_slab_capacity(DEFAULT_SLAB_CAPACITY)
    }

    /// Create an arena whose slabs hold `slab_capacity` values each.
    ///
    /// # Panics
    ///
    /// Panics if `slab_capacity` is zero.
    pub fn with_slab_capacity(slab_capacity: usize) -> Self {
        assert!(slab_capacity > 0, "arena slabs need a nonzero capacity");
        Self {
            slabs: vec![Vec::with_capacity(slab_capacity)],
            current: 0,
            slab_capacity,
            len: 0,
        }
    }

    /// Number of live allocations.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes held by live allocations, tags included.
    #[inline]
    pub fn live_bytes(&self) -> usize {
        self.len * Self::SLOT_SIZE
    }

    /// Number of slabs in the chain, empty ones included.
    #[inline]
    pub fn slab_count(&self) -> usize {
        self.slabs.len()
    }

    #[inline]
    pub fn slab_capacity(&self) -> usize {
        self.slab_capacity
    }

    /// Bump-allocate `value`.
    pub fn alloc(&mut self, value: T) -> ArenaId {
        if self.slabs[self.current].len() == self.slab_capacity {
            self.current += 1;
            if self.current == self.slabs.len() {
                self.slabs.push(Vec::with_capacity(self.slab_capacity));
                tracing::trace!(slabs = self.slabs.len(), "arena appended slab");
            }
        }

        let id = match u32::try_from(self.len) {
            Ok(raw) => ArenaId(raw),
            Err(_) => panic!("arena exceeded {} allocations", u32::MAX),
        };
        let tag = Tag {
            id,
            size: Self::SLOT_SIZE as u32,
        };
        self.slabs[self.current].push(Slot { tag, value });
        self.len += 1;
        id
    }

    /// Deallocate the most recent allocation and return its value.
    pub fn pop(&mut self) -> Option<T> {
        if self.slabs[self.current].is_empty() {
            if self.current == 0 {
                return None;
            }
            self.current -= 1;
        }
        let slot = self.slabs[self.current].pop()?;
        debug_assert_eq!(slot.tag.id.index(), self.len - 1);
        self.len -= 1;
        Some(slot.value)
    }

    /// Deallocate `id`, which must be the most recent allocation.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not the most recent live allocation. Freeing out
    /// of order would corrupt the bump cursor, so this check is never
    /// compiled out.
    pub fn free(&mut self, id: ArenaId) -> T {
        let last = self.last_tag();
        assert!(
            last.is_some_and(|tag| tag.id == id && tag.size as usize == Self::SLOT_SIZE),
            "arena free out of LIFO order: freeing {id:?}, most recent is {:?}",
            last.map(|tag| tag.id)
        );
        match self.pop() {
            Some(value) => value,
            None => unreachable!("tag checked above"),
        }
    }

    /// The most recent live allocation.
    pub fn last(&self) -> Option<ArenaId> {
        self.last_tag().map(|tag| tag.id)
    }

    fn last_tag(&self) -> Option<Tag> {
        let slab = if self.slabs[self.current].is_empty() && self.current > 0 {
            &self.slabs[self.current - 1]
        } else {
            &self.slabs[self.current]
        };
        slab.last().map(|slot| slot.tag)
    }

    #[inline]
    fn locate(&self, id: ArenaId) -> (usize, usize) {
        let index = id.index();
        assert!(index < self.len, "stale arena id {id:?}");
        (index / self.slab_capacity, index % self.slab_capacity)
    }

    #[inline]
    pub fn get(&self, id: ArenaId) -> &T {
        let (slab, offset) = self.locate(id);
        &self.slabs[slab][offset].value
    }

    #[inline]
    pub fn get_mut(&mut self, id: ArenaId) -> &mut T {
        let (slab, offset) = self.locate(id);
        &mut self.slabs[slab][offset].value
    }

    /// Drop every allocation and rewind to the first slab.
    ///
    /// Slab memory is kept for reuse. For values without drop glue this is
    /// linear in the number of slabs, not in the number of allocations.
    pub fn reset(&mut self) {
        for slab in &mut self.slabs[..=self.current] {
            slab.clear();
        }
        self.current = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_allocation_order() {
        let mut arena = Arena::with_slab_capacity(2);
        let ids: Vec<_> = (0..5).map(|n| arena.alloc(n)).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(arena.len(), 5);
        assert_eq!(arena.slab_count(), 3);
        assert_eq!(*arena.get(ids[3]), 3);
        *arena.get_mut(ids[4]) = 40;
        assert_eq!(arena.last(), Some(ids[4]));
        assert_eq!(arena.pop(), Some(40));
    }

    #[test]
    fn pop_walks_back_across_slabs() {
        let mut arena = Arena::with_slab_capacity(2);
        for n in 0..5 {
            arena.alloc(n);
        }
        let popped: Vec<_> = std::iter::from_fn(|| arena.pop()).collect();
        assert_eq!(popped, vec![4, 3, 2, 1, 0]);
        assert!(arena.is_empty());
        assert_eq!(arena.live_bytes(), 0);
        assert_eq!(arena.pop(), None);
    }

    #[test]
    fn emptied_slabs_are_reused() {
        let mut arena = Arena::with_slab_capacity(2);
        for n in 0..6 {
            arena.alloc(n);
        }
        for _ in 0..4 {
            arena.pop();
        }
        for n in 0..4 {
            arena.alloc(n);
        }
        assert_eq!(arena.slab_count(), 3);
        assert_eq!(arena.len(), 6);
    }

    #[test]
    fn live_bytes_track_allocations() {
        let mut arena = Arena::<u64>::new();
        let empty = arena.live_bytes();
        let id = arena.alloc(7);
        let one = arena.live_bytes();
        assert!(one > empty);
        arena.free(id);
        assert_eq!(arena.live_bytes(), empty);
    }

    #[test]
    #[should_panic(expected = "LIFO")]
    fn out_of_order_free_is_fatal() {
        let mut arena = Arena::new();
        let first = arena.alloc('a');
        arena.alloc('b');
        arena.free(first);
    }

    #[test]
    fn reset_keeps_slabs() {
        let mut arena = Arena::with_slab_capacity(4);
        for n in 0..10 {
            arena.alloc(n);
        }
        arena.reset();
        assert!(arena.is_empty());
        assert_eq!(arena.slab_count(), 3);
        let id = arena.alloc(99);
        assert_eq!(id.index(), 0);
        assert_eq!(*arena.get(id), 99);
    }

    #[test]
    #[should_panic(expected = "stale arena id")]
    fn freed_ids_are_stale() {
        let mut arena = Arena::new();
        let id = arena.alloc(1u8);
        arena.pop();
        let _ = arena.get(id);
    }
}
