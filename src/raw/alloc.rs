use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr::NonNull;
use std::slice;

use super::group::{self, EMPTY};
use super::probe;
use crate::Error;

// An entry in the table.
pub struct Node<K, V, L> {
    // The cached hash of the key.
    pub hash: u64,
    // Links for ordered tables, zero-sized otherwise.
    pub links: L,
    pub key: K,
    pub value: V,
}

// A table laid out in a single allocation: `2^bits` nodes followed by
// `2^bits` metadata bytes.
//
// The store does not track which nodes are initialized, its owner does so
// through the metadata. Dropping a store releases the allocation without
// dropping any nodes.
pub struct Store<K, V, L> {
    // The raw allocation.
    ptr: NonNull<u8>,
    // The table exponent.
    bits: u8,
    // Offset of the metadata bytes from the start of the allocation.
    meta_offset: usize,
    // The allocation layout.
    layout: Layout,
    _node: PhantomData<Node<K, V, L>>,
}

// Safety: The store owns its nodes, like a `Box<[Node]>`.
unsafe impl<K: Send, V: Send, L: Send> Send for Store<K, V, L> {}
unsafe impl<K: Sync, V: Sync, L: Sync> Sync for Store<K, V, L> {}

impl<K, V, L> Store<K, V, L> {
    // Allocate a table with `2^bits` slots, all empty.
    pub fn alloc(bits: u8) -> Result<Store<K, V, L>, Error> {
        debug_assert!(bits > 0);

        let capacity = probe::capacity(bits);
        let (layout, meta_offset) = Self::layout(capacity)?;

        // Safety: `layout` has a non-zero size, there is always at least one
        // metadata byte.
        let ptr = unsafe { alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(ptr) else {
            return Err(Error::AllocError { layout });
        };

        // Initialize the meta table.
        //
        // Safety: The metadata bytes are within the allocation.
        unsafe { ptr.as_ptr().add(meta_offset).write_bytes(EMPTY, capacity) };

        Ok(Store {
            ptr,
            bits,
            meta_offset,
            layout,
            _node: PhantomData,
        })
    }

    // The table layout used for allocation.
    fn layout(capacity: usize) -> Result<(Layout, usize), Error> {
        let nodes = Layout::array::<MaybeUninit<Node<K, V, L>>>(capacity)
            .map_err(|_| Error::CapacityOverflow)?;
        let meta = Layout::array::<u8>(capacity).map_err(|_| Error::CapacityOverflow)?;
        let (layout, meta_offset) = nodes.extend(meta).map_err(|_| Error::CapacityOverflow)?;
        Ok((layout.pad_to_align(), meta_offset))
    }

    // The table exponent.
    #[inline]
    pub fn bits(&self) -> u8 {
        self.bits
    }

    // The number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        1 << self.bits
    }

    // Mask for the table length.
    #[inline]
    pub fn mask(&self) -> usize {
        self.capacity() - 1
    }

    // The metadata table.
    #[inline]
    pub fn meta(&self) -> &[u8] {
        // Safety: The metadata bytes are initialized on allocation.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().add(self.meta_offset), self.capacity()) }
    }

    // The metadata table, mutably.
    #[inline]
    pub fn meta_mut(&mut self) -> &mut [u8] {
        // Safety: The metadata bytes are initialized on allocation, and we
        // have unique access to the store.
        unsafe {
            slice::from_raw_parts_mut(self.ptr.as_ptr().add(self.meta_offset), self.capacity())
        }
    }

    // Returns `true` if the slot holds a live entry.
    #[inline]
    pub fn is_live(&self, i: usize) -> bool {
        group::is_live(self.meta()[i])
    }

    #[inline]
    fn slot(&self, i: usize) -> *mut MaybeUninit<Node<K, V, L>> {
        assert!(i < self.capacity(), "slot {i} out of bounds");
        // Safety: Checked that `i` is within the node array.
        unsafe { self.ptr.as_ptr().cast::<MaybeUninit<Node<K, V, L>>>().add(i) }
    }

    // Returns the node at the given slot.
    //
    // # Safety
    //
    // The slot must hold a live entry.
    #[inline]
    pub unsafe fn node(&self, i: usize) -> &Node<K, V, L> {
        debug_assert!(self.is_live(i));
        unsafe { (*self.slot(i)).assume_init_ref() }
    }

    // Returns the node at the given slot, mutably.
    //
    // # Safety
    //
    // The slot must hold a live entry.
    #[inline]
    pub unsafe fn node_mut(&mut self, i: usize) -> &mut Node<K, V, L> {
        debug_assert!(self.is_live(i));
        unsafe { (*self.slot(i)).assume_init_mut() }
    }

    // Returns a raw pointer to the node at the given slot.
    //
    // The pointer is valid for writes as long as the store is not accessed
    // through a shared reference to the same node.
    #[inline]
    pub fn node_ptr(&self, i: usize) -> *mut Node<K, V, L> {
        debug_assert!(self.is_live(i));
        self.slot(i).cast::<Node<K, V, L>>()
    }

    // Writes a node into the given slot and marks it live.
    //
    // # Safety
    //
    // The slot must not hold a live entry, it is overwritten without being dropped.
    #[inline]
    pub unsafe fn write(&mut self, i: usize, node: Node<K, V, L>) {
        debug_assert!(!self.is_live(i));
        let meta = group::h2(node.hash, self.bits);
        unsafe { (*self.slot(i)).write(node) };
        self.meta_mut()[i] = meta;
    }

    // Moves the node out of the given slot, leaving `meta` in its place.
    //
    // # Safety
    //
    // The slot must hold a live entry, which must not be read again.
    #[inline]
    pub unsafe fn take(&mut self, i: usize, meta: u8) -> Node<K, V, L> {
        debug_assert!(self.is_live(i) && !group::is_live(meta));
        self.meta_mut()[i] = meta;
        unsafe { (*self.slot(i)).assume_init_read() }
    }

    // Copies the node at `from` in `src` into the slot `to` of this store.
    //
    // # Safety
    //
    // The source slot must hold a live entry. Ownership of the node is
    // duplicated, exactly one of the two copies may be used afterwards.
    #[inline]
    pub unsafe fn copy_from(&mut self, to: usize, src: &Store<K, V, L>, from: usize) {
        debug_assert!(src.is_live(from) && !self.is_live(to));
        unsafe {
            let node = src.slot(from).cast::<Node<K, V, L>>();
            self.slot(to).cast::<Node<K, V, L>>().copy_from_nonoverlapping(node, 1);
            let meta = group::h2((*node).hash, self.bits);
            self.meta_mut()[to] = meta;
        }
    }

    // Drop every live node and reset the metadata.
    pub fn drop_entries(&mut self) {
        for i in 0..self.capacity() {
            if self.is_live(i) {
                // Safety: The slot is live, and is marked empty immediately.
                drop(unsafe { self.take(i, EMPTY) });
            }
        }

        self.meta_mut().fill(EMPTY);
    }
}

impl<K, V, L> Drop for Store<K, V, L> {
    fn drop(&mut self) {
        // Safety: The allocation was created with this layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}
