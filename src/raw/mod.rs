//! The hash table engine behind every map and set.

mod alloc;
mod group;
mod iter;
mod monitor;
mod order;
mod probe;

pub use iter::{Cursor, Iter, IterMut};
pub use monitor::{AttackEvent, AttackHook};
pub use order::{Insertion, Lru, Order, Passive, Unordered};
pub use probe::Tuning;

use std::marker::PhantomData;
use std::sync::OnceLock;
use std::time::Instant;
use std::{fmt, mem};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use self::alloc::{Node, Store};
use self::group::{Group, EMPTY, TOMBSTONE};
use self::monitor::AttackMonitor;
use self::probe::Probe;
use crate::Error;

/// An open-addressing hash table over caller-supplied hashes.
///
/// `RawMap` is the engine behind every map and set in this crate. It never
/// hashes keys itself: every operation that locates a key takes its 64-bit
/// hash, and lookups take a closure comparing stored keys with the key being
/// looked up. The same key must always be given the same hash.
///
/// The hash value 0 is reserved and treated as 1.
///
/// Small tables are scanned linearly, larger ones are probed in groups of 8
/// slots whose metadata bytes are matched in parallel. The ordering policy
/// `O` threads an index-linked list through the entries, see [`Order`].
pub struct RawMap<K, V, O: Order = Unordered> {
    // The slot store, `None` until the first allocation.
    store: Option<Store<K, V, O::Links>>,

    // The number of live entries.
    count: usize,

    // The oldest entry of an ordered table.
    head: usize,

    // Incremented every time the store is replaced or freed.
    generation: u64,

    // The maximum number of entries of an LRU table.
    limit: usize,

    tuning: Tuning,
    monitor: AttackMonitor,
    _order: PhantomData<O>,
}

// The result of probing for a key.
enum Slot {
    // The key was found at the given slot.
    Found(usize),

    // The key is absent and may be inserted at the given slot.
    Vacant(usize),

    // The key is absent and the probe sequence has no room for it.
    Full {
        // The probe passed the collision limit.
        flooded: bool,
    },
}

// The raw result of an insert operation.
pub(crate) enum InsertResult<V> {
    /// Inserted the entry.
    Inserted,

    /// Replaced the value of an existing entry.
    Replaced(V),

    /// Did not insert due to an existing entry, returning the rejected value.
    Occupied(V),
}

impl<K, V, O: Order> RawMap<K, V, O> {
    /// Creates an empty table. It does not allocate until it is first inserted into.
    pub fn new(tuning: Tuning) -> RawMap<K, V, O> {
        RawMap {
            store: None,
            count: 0,
            head: 0,
            generation: 0,
            limit: usize::MAX,
            tuning,
            monitor: AttackMonitor::default(),
            _order: PhantomData,
        }
    }

    /// Creates an empty table able to hold at least `capacity` entries.
    pub fn with_capacity(capacity: usize, tuning: Tuning) -> Result<RawMap<K, V, O>, Error> {
        let mut map = RawMap::new(tuning);
        map.reserve(capacity)?;
        Ok(map)
    }

    /// Returns the number of entries in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the table contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of slots in the table.
    #[inline]
    pub fn capacity(&self) -> usize {
        probe::capacity(self.bits())
    }

    /// Returns the exponent of the table size, 0 when nothing is allocated.
    #[inline]
    pub fn bits(&self) -> u8 {
        self.store.as_ref().map_or(0, Store::bits)
    }

    /// Returns the policy constants of this table.
    #[inline]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Returns the number of probes that met suspected hash flooding.
    #[inline]
    pub fn attacks(&self) -> usize {
        self.monitor.total()
    }

    /// Sets the callback notified of suspected hash flooding.
    ///
    /// The callback runs for the first event and then each time the number
    /// of events reaches a power of two. By default events are written to
    /// stderr.
    pub fn set_attack_hook(&mut self, hook: AttackHook) {
        self.monitor.set_hook(hook);
    }

    // Returns the live node at the given slot.
    #[inline]
    pub(crate) fn live(&self, i: usize) -> &Node<K, V, O::Links> {
        match &self.store {
            Some(store) => {
                assert!(store.is_live(i), "slot {i} is not occupied");
                // Safety: Checked that the slot is live.
                unsafe { store.node(i) }
            }
            None => unreachable!("slot {i} in an unallocated table"),
        }
    }

    // Returns the live node at the given slot, mutably.
    #[inline]
    pub(crate) fn live_mut(&mut self, i: usize) -> &mut Node<K, V, O::Links> {
        match &mut self.store {
            Some(store) => {
                assert!(store.is_live(i), "slot {i} is not occupied");
                // Safety: Checked that the slot is live.
                unsafe { store.node_mut(i) }
            }
            None => unreachable!("slot {i} in an unallocated table"),
        }
    }

    // Raw node access for `IterMut`.
    #[inline]
    pub(crate) fn store(&self) -> Option<&Store<K, V, O::Links>> {
        self.store.as_ref()
    }

    #[inline]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

/// Lookups.
impl<K, V, O: Order> RawMap<K, V, O> {
    // Probe for the key with the given hash.
    //
    // A lookup gives up once the collisions pass the attack limit. An insert
    // keeps comparing keys to the end of the probe sequence, so it never
    // places a second copy of a key.
    fn find_slot(&self, hash: u64, lookup: bool, mut eq: impl FnMut(&K) -> bool) -> Slot {
        let Some(store) = &self.store else {
            return Slot::Full { flooded: false };
        };

        let h2 = group::h2(hash, store.bits());
        let meta = store.meta();

        if self.tuning.is_dense(store.bits()) {
            // Entries are packed before the first empty slot.
            let mut hole = None;
            for (i, &m) in meta.iter().enumerate() {
                if m == EMPTY {
                    return Slot::Vacant(hole.unwrap_or(i));
                }

                if m == TOMBSTONE {
                    hole.get_or_insert(i);
                    continue;
                }

                if m == h2 {
                    // Safety: The metadata marks a live entry.
                    let node = unsafe { store.node(i) };
                    if node.hash == hash && eq(&node.key) {
                        return Slot::Found(i);
                    }
                }
            }

            return hole.map_or(Slot::Full { flooded: false }, Slot::Vacant);
        }

        let mut probe = Probe::start(hash, store.mask(), &self.tuning);
        let mut hole = None;
        let mut collisions = 0;
        let mut flooded = false;

        while probe.len < self.tuning.seek_limit {
            let slots = probe.group();
            let group = Group::gather(meta, &slots);

            for j in group.match_byte(h2) {
                // Safety: The metadata marks a live entry.
                let node = unsafe { store.node(slots[j]) };
                if node.hash == hash && eq(&node.key) {
                    return Slot::Found(slots[j]);
                }

                collisions += 1;
                if collisions > self.tuning.attack_limit && !flooded {
                    self.monitor.record(hash, collisions, store.capacity());
                    flooded = true;

                    if lookup {
                        return Slot::Full { flooded };
                    }
                }
            }

            if hole.is_none() {
                hole = group.match_tombstone().lowest().map(|j| slots[j]);
            }

            // An empty slot ends the probe sequence of every key.
            if let Some(j) = group.match_empty().lowest() {
                return Slot::Vacant(hole.unwrap_or(slots[j]));
            }

            probe.next();
        }

        hole.map_or(Slot::Full { flooded }, Slot::Vacant)
    }

    // Returns the slot holding the key with the given hash.
    #[inline]
    pub(crate) fn find(&self, hash: u64, eq: impl FnMut(&K) -> bool) -> Option<usize> {
        match self.find_slot(group::fix(hash), true, eq) {
            Slot::Found(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the entry for the key with the given hash.
    ///
    /// `eq` is called on stored keys that share the hash, and returns `true`
    /// for the key being looked up. LRU tables are not reordered, see
    /// [`touch`](RawMap::touch).
    #[inline]
    pub fn get(&self, hash: u64, eq: impl FnMut(&K) -> bool) -> Option<(&K, &V)> {
        let node = self.live(self.find(hash, eq)?);
        Some((&node.key, &node.value))
    }

    /// Returns the entry for the key with the given hash, mutably.
    #[inline]
    pub fn get_mut(&mut self, hash: u64, eq: impl FnMut(&K) -> bool) -> Option<(&K, &mut V)> {
        let i = self.find(hash, eq)?;
        let node = self.live_mut(i);
        Some((&node.key, &mut node.value))
    }

    /// Returns the entry for the key with the given hash, marking it as the
    /// most recently used entry of an LRU table.
    #[inline]
    pub fn touch(&mut self, hash: u64, eq: impl FnMut(&K) -> bool) -> Option<(&K, &mut V)> {
        let i = self.find(hash, eq)?;
        self.promote(i);
        let node = self.live_mut(i);
        Some((&node.key, &mut node.value))
    }

    // Mark the entry as most recently used.
    #[inline]
    pub(crate) fn promote(&mut self, i: usize) {
        if !O::LRU {
            return;
        }

        if let Some(store) = &mut self.store {
            store.move_to_back(&mut self.head, self.count, i);
        }
    }
}

/// Mutations.
impl<K, V, O: Order> RawMap<K, V, O> {
    /// Inserts an entry, returning the previous value if the key was present.
    ///
    /// The stored key is kept when the key is already present. On an LRU
    /// table at its limit, inserting a new key evicts the least recently
    /// used entry. On failure the table is left unchanged.
    pub fn insert(&mut self, hash: u64, key: K, value: V) -> Result<Option<V>, Error>
    where
        K: Eq,
    {
        match self.insert_entry(hash, key, value, true)?.1 {
            InsertResult::Replaced(old) => Ok(Some(old)),
            _ => Ok(None),
        }
    }

    /// Inserts an entry if the key is absent.
    ///
    /// Returns the value in the table along with the rejected value if the
    /// key was already present.
    pub fn insert_if_missing(
        &mut self,
        hash: u64,
        key: K,
        value: V,
    ) -> Result<(&mut V, Option<V>), Error>
    where
        K: Eq,
    {
        let (i, result) = self.insert_entry(hash, key, value, false)?;
        let rejected = match result {
            InsertResult::Occupied(value) => Some(value),
            _ => None,
        };

        Ok((&mut self.live_mut(i).value, rejected))
    }

    // Inserts an entry, returning its slot.
    pub(crate) fn insert_entry(
        &mut self,
        hash: u64,
        key: K,
        value: V,
        overwrite: bool,
    ) -> Result<(usize, InsertResult<V>), Error>
    where
        K: Eq,
    {
        let hash = group::fix(hash);
        let mut retries = 0;

        loop {
            match self.find_slot(hash, false, |k| *k == key) {
                Slot::Found(i) => {
                    self.promote(i);

                    let node = self.live_mut(i);
                    if overwrite {
                        let old = mem::replace(&mut node.value, value);
                        return Ok((i, InsertResult::Replaced(old)));
                    }

                    return Ok((i, InsertResult::Occupied(value)));
                }

                // Make room, then probe again as growth changes the table.
                _ if self.count >= self.tuning.max_load(self.bits()) => {
                    self.grow(self.count + 1)?;
                }

                Slot::Vacant(i) => {
                    // An LRU table at its limit evicts once the new entry
                    // is in place, so a failed insert evicts nothing.
                    let evict = O::LRU && self.count >= self.limit;
                    self.occupy(i, hash, key, value);
                    if evict {
                        self.pop_front();
                    }

                    return Ok((i, InsertResult::Inserted));
                }

                Slot::Full { flooded } => {
                    // Growing does not make room for keys sharing a probe
                    // sequence, and a third failure means the hashes are degenerate.
                    if flooded || retries == 2 {
                        return Err(Error::ProbeExhausted);
                    }

                    let bits = self.bits() + 1;
                    if bits > self.tuning.max_bits {
                        return Err(Error::ProbeExhausted);
                    }

                    self.rehash(bits, bits)?;
                    retries += 1;
                }
            }
        }
    }

    // Writes a new entry into a vacant slot.
    fn occupy(&mut self, i: usize, hash: u64, key: K, value: V) {
        let Some(store) = &mut self.store else {
            unreachable!("vacant slot {i} in an unallocated table")
        };

        let node = Node {
            hash,
            links: Default::default(),
            key,
            value,
        };

        // Safety: Vacant slots do not hold a live entry.
        unsafe { store.write(i, node) };

        if O::ORDERED {
            store.push_back(&mut self.head, self.count, i);
        }

        self.count += 1;
    }

    /// Removes the key with the given hash, returning the entry if it was present.
    pub fn remove(&mut self, hash: u64, eq: impl FnMut(&K) -> bool) -> Option<(K, V)> {
        let i = self.find(hash, eq)?;
        Some(self.remove_at(i))
    }

    // Removes the entry at the given slot.
    pub(crate) fn remove_at(&mut self, i: usize) -> (K, V) {
        let dense = self.tuning.is_dense(self.bits());
        let Some(store) = &mut self.store else {
            unreachable!("slot {i} in an unallocated table")
        };

        assert!(store.is_live(i), "slot {i} is not occupied");

        if O::ORDERED {
            store.unlink(&mut self.head, self.count, i);
        }

        // A dense table only needs tombstones before its last entry.
        let reclaim = dense && store.meta().get(i + 1).map_or(true, |&m| m == EMPTY);
        let meta = if reclaim { EMPTY } else { TOMBSTONE };

        // Safety: Checked that the slot is live, and it is marked dead by `take`.
        let node = unsafe { store.take(i, meta) };

        if reclaim {
            let meta = store.meta_mut();
            let mut j = i;
            while j > 0 && meta[j - 1] == TOMBSTONE {
                j -= 1;
                meta[j] = EMPTY;
            }
        }

        self.count -= 1;

        // Nothing left to probe past.
        if self.count == 0 {
            store.meta_mut().fill(EMPTY);
        }

        (node.key, node.value)
    }

    // Evict the oldest entry of an ordered table.
    fn pop_front(&mut self) {
        debug_assert!(O::ORDERED);

        if self.count > 0 {
            drop(self.remove_at(self.head));
        }
    }

    /// Evicts up to `n` entries, returning the number removed.
    ///
    /// Ordered tables evict their oldest entries, LRU tables their least
    /// recently used. Unordered tables evict entries at pseudo-random
    /// positions, this is meant for relieving memory pressure.
    pub fn evict(&mut self, n: usize) -> usize {
        let n = n.min(self.count);

        if O::ORDERED {
            for _ in 0..n {
                drop(self.remove_at(self.head));
            }

            return n;
        }

        let mut rng = SmallRng::seed_from_u64(clock_seed() ^ self.generation);
        for _ in 0..n {
            let start = rng.gen_range(0..self.capacity());
            match self.scan_forward(start).or_else(|| self.scan_forward(0)) {
                Some(i) => drop(self.remove_at(i)),
                None => unreachable!("{} entries but no live slot", self.count),
            }
        }

        n
    }

    /// Retains only the entries for which the predicate returns `true`.
    ///
    /// Entries are visited in iteration order.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        let mut next = self.first_slot();

        while let Some(i) = next {
            // The successor of a removed entry is still valid.
            next = self.succ(i);

            let node = self.live_mut(i);
            if !f(&node.key, &mut node.value) {
                drop(self.remove_at(i));
            }
        }
    }

    /// Removes all entries, keeping the allocated memory.
    pub fn clear(&mut self) {
        if let Some(store) = &mut self.store {
            store.drop_entries();
            // Cursors must not match the entries written next.
            self.generation += 1;
        }

        self.count = 0;
        self.head = 0;
    }
}

/// Sizing.
impl<K, V, O: Order> RawMap<K, V, O> {
    /// Reserves capacity for at least `additional` more entries.
    ///
    /// Does nothing if the table already has room. On failure the table is
    /// left unchanged.
    pub fn reserve(&mut self, additional: usize) -> Result<(), Error> {
        let len = self
            .count
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow)?;

        if len <= self.tuning.max_load(self.bits()) {
            return Ok(());
        }

        self.grow(len)
    }

    /// Shrinks the table as much as possible while holding its entries.
    ///
    /// An empty table releases its memory. This is best-effort: if the
    /// smaller table cannot be allocated the table is left as it is.
    pub fn compact(&mut self) {
        if self.count == 0 {
            if self.store.take().is_some() {
                self.generation += 1;
            }

            self.head = 0;
            return;
        }

        let Some(bits) = self.tuning.bits_for(self.count) else {
            return;
        };

        if bits < self.bits() {
            // Ignoring the error keeps the current table.
            let _ = self.rehash(bits, bits);
        }
    }

    // Grow the table to hold `len` entries.
    fn grow(&mut self, len: usize) -> Result<(), Error> {
        let bits = self.tuning.bits_for(len).ok_or(Error::CapacityOverflow)?;
        self.rehash(bits, self.tuning.max_bits)
    }

    // Move every entry into a new store of `2^bits` slots.
    //
    // Larger stores up to `2^ceiling` slots are tried if the entries cannot
    // be placed. The current store is only released once every entry has
    // been placed, so a failure leaves the table untouched.
    fn rehash(&mut self, mut bits: u8, ceiling: u8) -> Result<(), Error> {
        loop {
            let mut store = Store::alloc(bits)?;

            match self.migrate(&mut store) {
                Some(head) => {
                    // The old store is released without dropping the moved entries.
                    self.store = Some(store);
                    self.head = head;
                    self.generation += 1;
                    return Ok(());
                }

                // The copies in the new store are discarded, the entries
                // are still owned by the current store.
                None if bits < ceiling => bits += 1,
                None => return Err(Error::ProbeExhausted),
            }
        }
    }

    // Copy every entry into `new` in iteration order, returning the new list head.
    fn migrate(&self, new: &mut Store<K, V, O::Links>) -> Option<usize> {
        let mut head = 0;
        let Some(old) = &self.store else {
            return Some(head);
        };

        let mut placed = 0;
        let mut next = self.first_slot();

        while let Some(i) = next {
            let hash = self.live(i).hash;
            let to = self.place(new, hash)?;

            // Safety: `i` is live and `to` is empty. Exactly one of the
            // copies is kept by `rehash`.
            unsafe { new.copy_from(to, old, i) };

            if O::ORDERED {
                new.push_back(&mut head, placed, to);
            }

            placed += 1;
            next = self.succ(i);
        }

        Some(head)
    }

    // Find an empty slot for a hash in a store without tombstones.
    fn place(&self, store: &Store<K, V, O::Links>, hash: u64) -> Option<usize> {
        let meta = store.meta();

        if self.tuning.is_dense(store.bits()) {
            return meta.iter().position(|&m| m == EMPTY);
        }

        let mut probe = Probe::start(hash, store.mask(), &self.tuning);
        while probe.len < self.tuning.seek_limit {
            let slots = probe.group();
            if let Some(j) = Group::gather(meta, &slots).match_empty().lowest() {
                return Some(slots[j]);
            }

            probe.next();
        }

        None
    }
}

/// LRU limits.
impl<K, V> RawMap<K, V, Lru> {
    /// Returns the maximum number of entries.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Sets the maximum number of entries, evicting the least recently
    /// used entries above it.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is 0.
    pub fn set_limit(&mut self, limit: usize) {
        assert!(limit > 0, "an LRU table must hold at least one entry");

        self.limit = limit;
        if self.count > limit {
            self.evict(self.count - limit);
        }
    }
}

impl<K, V, O: Order> Drop for RawMap<K, V, O> {
    fn drop(&mut self) {
        if let Some(store) = &mut self.store {
            store.drop_entries();
        }
    }
}

impl<K, V, O> fmt::Debug for RawMap<K, V, O>
where
    K: fmt::Debug,
    V: fmt::Debug,
    O: Order,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// A seed for eviction, from a monotonic clock.
fn clock_seed() -> u64 {
    static START: OnceLock<Instant> = OnceLock::new();
    let start = *START.get_or_init(Instant::now);
    start.elapsed().as_nanos() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    // A multiplicative hash, good enough to spread integers.
    fn hash(x: u64) -> u64 {
        x.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    // The number of slots whose metadata marks a live entry.
    fn live_slots<K, V, O: Order>(map: &RawMap<K, V, O>) -> usize {
        map.store()
            .map_or(0, |store| store.meta().iter().filter(|&&m| group::is_live(m)).count())
    }

    #[test]
    fn count_matches_metadata() {
        let mut map: RawMap<u64, u64> = RawMap::new(Tuning::default());
        for i in 0..300 {
            map.insert(hash(i), i, i).unwrap();
            assert_eq!(live_slots(&map), map.len());
        }

        for i in (0..300).step_by(3) {
            assert_eq!(map.remove(hash(i), |&k| k == i), Some((i, i)));
            assert_eq!(live_slots(&map), map.len());
        }

        assert_eq!(map.len(), 200);
        map.compact();
        assert_eq!(live_slots(&map), 200);
    }

    #[test]
    fn dense_reclaims_trailing_tombstones() {
        let mut map: RawMap<u64, ()> = RawMap::new(Tuning::default());
        for i in 0..6 {
            map.insert(hash(i), i, ()).unwrap();
        }
        assert_eq!(map.bits(), 3);

        // Remove out of order, the last removal frees the whole tail.
        map.remove(hash(3), |&k| k == 3);
        map.remove(hash(4), |&k| k == 4);
        assert_eq!(map.store().unwrap().meta()[3], TOMBSTONE);
        map.remove(hash(5), |&k| k == 5);

        let meta = map.store().unwrap().meta();
        assert!(meta[3..].iter().all(|&m| m == EMPTY));
        assert_eq!(live_slots(&map), 3);
    }

    #[test]
    fn zero_hash_is_reserved() {
        let mut map: RawMap<u64, u64> = RawMap::new(Tuning::default());
        map.insert(0, 7, 1).unwrap();
        assert_eq!(map.get(1, |&k| k == 7), Some((&7, &1)));
        assert_eq!(map.live(map.find(0, |&k| k == 7).unwrap()).hash, 1);
    }

    #[test]
    fn failed_growth_keeps_table() {
        let tuning = Tuning {
            max_bits: 4,
            ..Tuning::default()
        };

        let mut map: RawMap<u64, u64, Insertion> = RawMap::new(tuning);
        for i in 0..14 {
            map.insert(hash(i), i, i).unwrap();
        }

        let generation = map.generation();
        assert_eq!(map.insert(hash(99), 99, 99), Err(Error::CapacityOverflow));
        assert_eq!(map.reserve(1), Err(Error::CapacityOverflow));
        assert_eq!(map.generation(), generation);
        assert_eq!(map.len(), 14);

        let keys: Vec<u64> = map.iter().map(|(&k, _)| k).collect();
        assert_eq!(keys, (0..14).collect::<Vec<_>>());
    }

    #[test]
    fn lru_failed_insert_evicts_nothing() {
        let tuning = Tuning {
            seek_limit: 1,
            max_bits: 7,
            ..Tuning::default()
        };

        // 128 slots, hash 42 has a single group in the lower half of the
        // table and hash 106 one in the upper half.
        let mut map: RawMap<u64, u64, Lru> = RawMap::with_capacity(100, tuning).unwrap();
        assert_eq!(map.bits(), 7);
        map.set_limit(9);

        map.insert(106, 1000, 0).unwrap();
        for i in 0..8 {
            assert_eq!(map.insert(42, i, i), Ok(None));
        }
        assert_eq!(map.len(), 9);

        // The group of hash 42 is full and the table cannot grow.
        assert_eq!(map.insert(42, 100, 100), Err(Error::ProbeExhausted));
        assert_eq!(map.len(), 9);
        assert_eq!(map.get(106, |&k| k == 1000), Some((&1000, &0)));
        assert_eq!(map.first_slot().map(|i| map.live(i).key), Some(1000));

        // A key with room evicts the least recently used entry.
        assert_eq!(map.insert(7, 200, 200), Ok(None));
        assert_eq!(map.len(), 9);
        assert_eq!(map.get(106, |&k| k == 1000), None);
        assert_eq!(map.get(7, |&k| k == 200), Some((&200, &200)));
        assert_eq!(live_slots(&map), 9);
    }

    #[test]
    fn clear_invalidates_generation() {
        let mut map: RawMap<u64, u64, Insertion> = RawMap::new(Tuning::default());
        map.insert(hash(0), 0, 0).unwrap();

        let generation = map.generation();
        map.clear();
        assert_ne!(map.generation(), generation);

        // Clearing a table without memory has nothing to invalidate.
        let mut empty: RawMap<u64, u64> = RawMap::new(Tuning::default());
        empty.clear();
        assert_eq!(empty.generation(), 0);
    }
}
