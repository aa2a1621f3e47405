use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::ControlFlow;

use super::group::Group;
use super::{Order, RawMap};

/// A position in the iteration order of a map.
///
/// A cursor does not borrow the map, so the map may be modified between
/// steps. As long as the entry it points at is still in place, stepping from
/// a cursor follows the entry's neighbours directly. If the entry was
/// removed or the table was rehashed, stepping re-seeks by ordinal position
/// instead: the next entry is the one at `position() + 1` in the current
/// iteration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    // The ordinal position of the entry.
    pos: usize,
    // The slot of the entry.
    slot: usize,
    // The hash of the entry's key.
    hash: u64,
    // The table generation the slot belongs to.
    validator: u64,
}

impl Cursor {
    /// Returns the ordinal position of the entry, counting from 0.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Traversal.
impl<K, V, O: Order> RawMap<K, V, O> {
    // The slot of the first entry in iteration order.
    pub(crate) fn first_slot(&self) -> Option<usize> {
        if self.count == 0 {
            return None;
        }

        if O::ORDERED {
            return Some(self.head);
        }

        self.scan_forward(0)
    }

    // The slot of the last entry in iteration order.
    pub(crate) fn last_slot(&self) -> Option<usize> {
        if self.count == 0 {
            return None;
        }

        let store = self.store.as_ref()?;
        if O::ORDERED {
            return Some(store.prev(self.head));
        }

        self.scan_backward(store.capacity())
    }

    // The slot following the live slot `i` in iteration order.
    pub(crate) fn succ(&self, i: usize) -> Option<usize> {
        if O::ORDERED {
            let next = self.store.as_ref()?.next(i);
            return (next != self.head).then_some(next);
        }

        self.scan_forward(i + 1)
    }

    // The slot preceding the live slot `i` in iteration order.
    pub(crate) fn pred(&self, i: usize) -> Option<usize> {
        if O::ORDERED {
            if i == self.head {
                return None;
            }

            return Some(self.store.as_ref()?.prev(i));
        }

        self.scan_backward(i)
    }

    // The first live slot at or after `from`, scanning 8 metadata bytes at a time.
    pub(crate) fn scan_forward(&self, mut from: usize) -> Option<usize> {
        let meta = self.store.as_ref()?.meta();

        while from < meta.len() {
            if let Some(j) = Group::load(meta, from).match_live().lowest() {
                return Some(from + j);
            }

            from += 8;
        }

        None
    }

    // The last live slot before `end`, scanning 8 metadata bytes at a time.
    pub(crate) fn scan_backward(&self, end: usize) -> Option<usize> {
        let meta = self.store.as_ref()?.meta();
        let mut end = end.min(meta.len());

        while end > 0 {
            let start = end.saturating_sub(8);
            if let Some(j) = Group::load(&meta[..end], start).match_live().highest() {
                return Some(start + j);
            }

            end = start;
        }

        None
    }

    // The slot of the entry at ordinal position `n`.
    pub(crate) fn nth_slot(&self, n: usize) -> Option<usize> {
        if n >= self.count {
            return None;
        }

        // Walk from whichever end is closer.
        if n < self.count / 2 {
            let mut i = self.first_slot()?;
            for _ in 0..n {
                i = self.succ(i)?;
            }
            Some(i)
        } else {
            let mut i = self.last_slot()?;
            for _ in n + 1..self.count {
                i = self.pred(i)?;
            }
            Some(i)
        }
    }

    // Returns `true` if the cursor still points at its entry.
    fn is_fresh(&self, cursor: &Cursor) -> bool {
        if cursor.validator != self.generation() {
            return false;
        }

        self.store.as_ref().is_some_and(|store| {
            cursor.slot < store.capacity()
                && store.is_live(cursor.slot)
                // Safety: Checked that the slot is live.
                && unsafe { store.node(cursor.slot) }.hash == cursor.hash
        })
    }

    fn cursor(&self, pos: usize, slot: usize) -> (Cursor, &K, &V) {
        let node = self.live(slot);
        let cursor = Cursor {
            pos,
            slot,
            hash: node.hash,
            validator: self.generation(),
        };

        (cursor, &node.key, &node.value)
    }

    /// Returns the entry after the cursor, or the first entry if `cursor` is `None`.
    ///
    /// This never reorders an LRU table.
    pub fn get_next(&self, cursor: Option<Cursor>) -> Option<(Cursor, &K, &V)> {
        let (pos, slot) = match cursor {
            None => (0, self.first_slot()?),
            Some(c) if self.is_fresh(&c) => (c.pos + 1, self.succ(c.slot)?),
            // The table changed under the cursor, seek by position.
            Some(c) => (c.pos + 1, self.nth_slot(c.pos + 1)?),
        };

        Some(self.cursor(pos, slot))
    }

    /// Returns the entry before the cursor, or the last entry if `cursor` is `None`.
    pub fn get_prev(&self, cursor: Option<Cursor>) -> Option<(Cursor, &K, &V)> {
        let (pos, slot) = match cursor {
            None => (self.count.checked_sub(1)?, self.last_slot()?),
            Some(c) if self.is_fresh(&c) => (c.pos.saturating_sub(1), self.pred(c.slot)?),
            Some(c) => {
                let pos = c.pos.checked_sub(1)?.min(self.count.checked_sub(1)?);
                (pos, self.nth_slot(pos)?)
            }
        };

        Some(self.cursor(pos, slot))
    }

    /// Calls `f` on the entries in iteration order, starting at ordinal
    /// position `start_at`.
    ///
    /// A negative `start_at` counts from the end, `-1` being the last entry.
    /// Iteration stops early when `f` returns [`ControlFlow::Break`].
    /// Returns the number of entries `f` was called on.
    pub fn each<F>(&self, start_at: isize, mut f: F) -> usize
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        let start = if start_at < 0 {
            self.count.saturating_sub(start_at.unsigned_abs())
        } else {
            start_at as usize
        };

        let mut visited = 0;
        let mut next = self.nth_slot(start);

        while let Some(i) = next {
            visited += 1;

            let node = self.live(i);
            if f(&node.key, &node.value).is_break() {
                break;
            }

            next = self.succ(i);
        }

        visited
    }

    /// An iterator over the entries, in iteration order.
    pub fn iter(&self) -> Iter<'_, K, V, O> {
        Iter {
            map: self,
            front: self.first_slot(),
            back: self.last_slot(),
            remaining: self.count,
        }
    }

    /// An iterator over the entries with mutable references to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, O> {
        IterMut {
            front: self.first_slot(),
            back: self.last_slot(),
            remaining: self.count,
            map: self,
            _values: PhantomData,
        }
    }
}

/// An iterator over the entries of a [`RawMap`].
pub struct Iter<'a, K, V, O: Order> {
    map: &'a RawMap<K, V, O>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, K, V, O: Order> Iterator for Iter<'a, K, V, O> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let i = self.front?;
        self.remaining -= 1;
        self.front = self.map.succ(i);

        let node = self.map.live(i);
        Some((&node.key, &node.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, O: Order> DoubleEndedIterator for Iter<'_, K, V, O> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let i = self.back?;
        self.remaining -= 1;
        self.back = self.map.pred(i);

        let node = self.map.live(i);
        Some((&node.key, &node.value))
    }
}

impl<K, V, O: Order> ExactSizeIterator for Iter<'_, K, V, O> {}
impl<K, V, O: Order> FusedIterator for Iter<'_, K, V, O> {}

impl<K, V, O: Order> Clone for Iter<'_, K, V, O> {
    #[inline]
    fn clone(&self) -> Self {
        Iter {
            map: self.map,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

/// A mutable iterator over the entries of a [`RawMap`].
pub struct IterMut<'a, K, V, O: Order> {
    // Shared access to the table structure. The values are reached through
    // the store's raw pointer, and each is yielded at most once.
    map: &'a RawMap<K, V, O>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
    _values: PhantomData<&'a mut V>,
}

impl<'a, K, V, O: Order> IterMut<'a, K, V, O> {
    #[inline]
    fn yield_slot(&self, i: usize) -> Option<(&'a K, &'a mut V)> {
        let node = self.map.store()?.node_ptr(i);

        // Safety: The iterator was created from a unique borrow of the table,
        // and yields every slot at most once.
        let node = unsafe { &mut *node };
        Some((&node.key, &mut node.value))
    }
}

impl<'a, K, V, O: Order> Iterator for IterMut<'a, K, V, O> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let i = self.front?;
        self.remaining -= 1;

        // Step before yielding, the yielded node is not read again.
        self.front = if self.remaining > 0 {
            self.map.succ(i)
        } else {
            None
        };

        self.yield_slot(i)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, O: Order> DoubleEndedIterator for IterMut<'_, K, V, O> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let i = self.back?;
        self.remaining -= 1;

        self.back = if self.remaining > 0 {
            self.map.pred(i)
        } else {
            None
        };

        self.yield_slot(i)
    }
}

impl<K, V, O: Order> ExactSizeIterator for IterMut<'_, K, V, O> {}
impl<K, V, O: Order> FusedIterator for IterMut<'_, K, V, O> {}
