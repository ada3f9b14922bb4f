use alloc::vec::Vec;
use core::mem;

use super::handle::Handle;

#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    /// Links to the next vacant slot, forming a LIFO free list through the arena.
    Vacant(Option<Handle>),
}

/// Slot storage for tree nodes.
///
/// A removed node leaves its slot on a free list threaded through the vacant
/// slots themselves; the next allocation takes the most recently freed slot.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    next_vacant: Option<Handle>,
    occupied: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_vacant: None,
            occupied: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            next_vacant: None,
            occupied: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of occupied slots.
    pub(crate) const fn len(&self) -> usize {
        self.occupied
    }

    pub(crate) fn alloc(&mut self, node: T) -> Handle {
        let Some(handle) = self.next_vacant else {
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Slot::Occupied(node));
            self.occupied += 1;
            return Handle::from_index(self.slots.len() - 1);
        };

        let slot = &mut self.slots[handle.to_index()];
        self.next_vacant = match mem::replace(slot, Slot::Occupied(node)) {
            Slot::Vacant(next) => next,
            Slot::Occupied(_) => unreachable!("`Arena::alloc()` - free list reached an occupied slot!"),
        };
        self.occupied += 1;
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.to_index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => panic!("`Arena::get()` - `handle` is invalid!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.to_index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => panic!("`Arena::get_mut()` - `handle` is invalid!"),
        }
    }

    /// Moves the node out of its slot and pushes the slot onto the free list.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let slot = &mut self.slots[handle.to_index()];
        if matches!(slot, Slot::Vacant(_)) {
            panic!("`Arena::take()` - `handle` is invalid!");
        }
        let Slot::Occupied(node) = mem::replace(slot, Slot::Vacant(self.next_vacant)) else {
            unreachable!();
        };
        self.next_vacant = Some(handle);
        self.occupied -= 1;
        node
    }

    /// Drops every node and forgets every slot, keeping the allocation.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.next_vacant = None;
        self.occupied = 0;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn with_capacity_reserves_slots() {
        let arena: Arena<u32> = Arena::with_capacity(10);
        assert!(arena.capacity() >= 10);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn freed_slots_are_reused_most_recent_first() {
        let mut arena = Arena::new();
        let a = arena.alloc('a');
        let b = arena.alloc('b');
        let _c = arena.alloc('c');
        assert_eq!(arena.take(a), 'a');
        assert_eq!(arena.take(b), 'b');
        assert_eq!(arena.len(), 1);

        assert_eq!(arena.alloc('d'), b);
        assert_eq!(arena.alloc('e'), a);
        assert_eq!(*arena.get(a), 'e');
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.slots.len(), 3);
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - `handle` is invalid!")]
    fn get_after_take_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(1u8);
        let _ = arena.take(a);
        let _ = arena.get(a);
    }

    #[test]
    #[should_panic(expected = "`Arena::take()` - `handle` is invalid!")]
    fn double_take_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(1u8);
        let _ = arena.take(a);
        let _ = arena.take(a);
    }

    #[derive(Clone, Debug)]
    enum Step {
        Store(u32),
        Replace(usize, u32),
        Release(usize),
        Reset,
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            12 => any::<u32>().prop_map(Step::Store),
            3 => (any::<usize>(), any::<u32>()).prop_map(|(pick, value)| Step::Replace(pick, value)),
            6 => any::<usize>().prop_map(Step::Release),
            1 => Just(Step::Reset),
        ]
    }

    proptest! {
        #[test]
        fn live_handles_keep_their_values(steps in prop::collection::vec(step_strategy(), 0..256)) {
            let mut live: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for step in steps {
                match step {
                    Step::Store(value) => {
                        let handle = arena.alloc(value);
                        prop_assert!(live.iter().all(|&(h, _)| h != handle), "handle {:?} handed out twice", handle);
                        live.push((handle, value));
                    }
                    Step::Replace(pick, value) if !live.is_empty() => {
                        let index = pick % live.len();
                        let entry = &mut live[index];
                        *arena.get_mut(entry.0) = value;
                        entry.1 = value;
                    }
                    Step::Release(pick) if !live.is_empty() => {
                        let (handle, value) = live.swap_remove(pick % live.len());
                        prop_assert_eq!(arena.take(handle), value);
                    }
                    Step::Reset => {
                        arena.clear();
                        live.clear();
                    }
                    Step::Replace(..) | Step::Release(_) => {}
                }

                prop_assert_eq!(arena.len(), live.len());
                prop_assert!(arena.slots.len() >= live.len());
                for &(handle, value) in &live {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }
}
