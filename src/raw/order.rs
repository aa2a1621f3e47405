// Ordering policies, and the index-linked list threaded through ordered tables.
//
// The list is circular and anchored at `head`, the oldest entry. `prev(head)`
// is the newest entry. Links are slot indices, so they stay meaningful when
// the store moves, but must be rebuilt when entries are rehashed.

use super::alloc::Store;

mod sealed {
    pub trait Sealed {}
}

/// The ordering policy of a map.
///
/// This trait is sealed, the policies are [`Unordered`], [`Insertion`] and [`Lru`].
pub trait Order: sealed::Sealed + 'static {
    #[doc(hidden)]
    type Links: Link;

    #[doc(hidden)]
    const ORDERED: bool;

    #[doc(hidden)]
    const LRU: bool;
}

/// Marker for policies whose lookups never reorder entries.
pub trait Passive: Order {}

/// Entries are iterated in table order, which is unspecified.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unordered;

/// Entries are iterated in insertion order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Insertion;

/// Entries are iterated from least to most recently used.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lru;

impl sealed::Sealed for Unordered {}
impl sealed::Sealed for Insertion {}
impl sealed::Sealed for Lru {}

impl Order for Unordered {
    type Links = Unlinked;
    const ORDERED: bool = false;
    const LRU: bool = false;
}

impl Order for Insertion {
    type Links = Linked;
    const ORDERED: bool = true;
    const LRU: bool = false;
}

impl Order for Lru {
    type Links = Linked;
    const ORDERED: bool = true;
    const LRU: bool = true;
}

impl Passive for Unordered {}
impl Passive for Insertion {}

// Per-node list links.
pub trait Link: Copy + Default + Send + Sync + 'static {
    fn next(&self) -> usize;
    fn prev(&self) -> usize;
    fn set_next(&mut self, i: usize);
    fn set_prev(&mut self, i: usize);
}

// Links of an unordered table, which has no list.
#[doc(hidden)]
#[derive(Clone, Copy, Default)]
pub struct Unlinked;

impl Link for Unlinked {
    #[inline]
    fn next(&self) -> usize {
        unreachable!("unordered tables have no links")
    }

    #[inline]
    fn prev(&self) -> usize {
        unreachable!("unordered tables have no links")
    }

    #[inline]
    fn set_next(&mut self, _: usize) {}

    #[inline]
    fn set_prev(&mut self, _: usize) {}
}

// Links of an ordered table.
#[doc(hidden)]
#[derive(Clone, Copy, Default)]
pub struct Linked {
    next: u32,
    prev: u32,
}

// Slot indices are bounded by `2^31`.
impl Link for Linked {
    #[inline]
    fn next(&self) -> usize {
        self.next as usize
    }

    #[inline]
    fn prev(&self) -> usize {
        self.prev as usize
    }

    #[inline]
    fn set_next(&mut self, i: usize) {
        self.next = i as u32;
    }

    #[inline]
    fn set_prev(&mut self, i: usize) {
        self.prev = i as u32;
    }
}

// List operations. All slots passed in must hold live entries, and `head`
// must be a member of the list whenever the list is non-empty.
impl<K, V, L: Link> Store<K, V, L> {
    #[inline]
    pub fn next(&self, i: usize) -> usize {
        // Safety: Guaranteed by the caller.
        unsafe { self.node(i) }.links.next()
    }

    #[inline]
    pub fn prev(&self, i: usize) -> usize {
        // Safety: Guaranteed by the caller.
        unsafe { self.node(i) }.links.prev()
    }

    #[inline]
    fn set_next(&mut self, i: usize, next: usize) {
        // Safety: Guaranteed by the caller.
        unsafe { self.node_mut(i) }.links.set_next(next);
    }

    #[inline]
    fn set_prev(&mut self, i: usize, prev: usize) {
        // Safety: Guaranteed by the caller.
        unsafe { self.node_mut(i) }.links.set_prev(prev);
    }

    // Append `i` as the newest entry of a list holding `len` other entries.
    pub fn push_back(&mut self, head: &mut usize, len: usize, i: usize) {
        if len == 0 {
            self.set_next(i, i);
            self.set_prev(i, i);
            *head = i;
            return;
        }

        let tail = self.prev(*head);
        self.set_prev(i, tail);
        self.set_next(i, *head);
        self.set_next(tail, i);
        self.set_prev(*head, i);
    }

    // Remove `i` from a list holding `len` entries, including `i`.
    pub fn unlink(&mut self, head: &mut usize, len: usize, i: usize) {
        if len <= 1 {
            return;
        }

        let (prev, next) = (self.prev(i), self.next(i));
        self.set_next(prev, next);
        self.set_prev(next, prev);

        if *head == i {
            *head = next;
        }
    }

    // Make `i` the newest entry of a list holding `len` entries, including `i`.
    pub fn move_to_back(&mut self, head: &mut usize, len: usize, i: usize) {
        // The list is circular, so the oldest entry becomes the newest by
        // rotating the head.
        if *head == i {
            *head = self.next(i);
            return;
        }

        // Already the newest.
        if self.prev(*head) == i {
            return;
        }

        self.unlink(head, len, i);
        self.push_back(head, len - 1, i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::alloc::Node;

    fn store(slots: &[usize]) -> (Store<u32, (), Linked>, usize) {
        let mut store = Store::alloc(3).unwrap();
        let mut head = 0;
        for (len, &i) in slots.iter().enumerate() {
            unsafe {
                store.write(
                    i,
                    Node {
                        hash: i as u64 + 1,
                        links: Linked::default(),
                        key: i as u32,
                        value: (),
                    },
                )
            };
            store.push_back(&mut head, len, i);
        }
        (store, head)
    }

    fn forward(store: &Store<u32, (), Linked>, head: usize, len: usize) -> Vec<usize> {
        let mut out = vec![head];
        let mut i = head;
        for _ in 1..len {
            i = store.next(i);
            out.push(i);
        }
        assert_eq!(store.next(i), head);
        out
    }

    #[test]
    fn push_and_unlink() {
        let (mut store, mut head) = store(&[4, 1, 6]);
        assert_eq!(forward(&store, head, 3), [4, 1, 6]);
        assert_eq!(store.prev(head), 6);

        store.unlink(&mut head, 3, 4);
        assert_eq!(head, 1);
        assert_eq!(forward(&store, head, 2), [1, 6]);

        store.unlink(&mut head, 2, 6);
        assert_eq!(forward(&store, head, 1), [1]);
    }

    #[test]
    fn move_to_back() {
        let (mut store, mut head) = store(&[0, 2, 3, 5]);

        store.move_to_back(&mut head, 4, 2);
        assert_eq!(forward(&store, head, 4), [0, 3, 5, 2]);

        store.move_to_back(&mut head, 4, 0);
        assert_eq!(forward(&store, head, 4), [3, 5, 2, 0]);

        store.move_to_back(&mut head, 4, 0);
        assert_eq!(forward(&store, head, 4), [3, 5, 2, 0]);
    }
}
