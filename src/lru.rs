use crate::map::{Iter, IterMut, Keys, Values};
use crate::raw::{Cursor, Lru, RawMap, Tuning};
use crate::{Equivalent, Error};

use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::ops::ControlFlow;

/// A hash map holding a bounded number of entries, evicting the least
/// recently used entry to make room for a new key.
///
/// Reading an entry with [`get`](LruMap::get) or overwriting it marks it as
/// most recently used, so lookups that update recency take `&mut self`.
/// [`peek`](LruMap::peek) reads an entry without touching it.
///
/// Iteration runs from the least to the most recently used entry.
///
/// # Examples
///
/// ```
/// use probemap::LruMap;
///
/// let mut cache = LruMap::new(3);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.insert("c", 3);
///
/// // "a" is now the most recently used entry.
/// assert_eq!(cache.get(&"a"), Some(&1));
///
/// // So "b" makes room for "d".
/// cache.insert("d", 4);
/// assert!(!cache.contains_key(&"b"));
///
/// let keys: Vec<_> = cache.keys().copied().collect();
/// assert_eq!(keys, ["c", "a", "d"]);
/// ```
pub struct LruMap<K, V, S = RandomState> {
    raw: RawMap<K, V, Lru>,
    hasher: S,
}

impl<K, V> LruMap<K, V> {
    /// Creates an empty `LruMap` holding at most `limit` entries.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is 0.
    pub fn new(limit: usize) -> LruMap<K, V> {
        LruMap::with_hasher(limit, RandomState::new())
    }
}

impl<K, V, S> LruMap<K, V, S> {
    /// Creates an empty `LruMap` holding at most `limit` entries, using
    /// `hash_builder` to hash the keys.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is 0.
    pub fn with_hasher(limit: usize, hash_builder: S) -> LruMap<K, V, S> {
        LruMap::from_raw(RawMap::new(Tuning::default()), limit, hash_builder)
    }

    pub(crate) fn from_raw(mut raw: RawMap<K, V, Lru>, limit: usize, hasher: S) -> LruMap<K, V, S> {
        raw.set_limit(limit);
        LruMap { raw, hasher }
    }

    /// Returns a reference to the map's [`BuildHasher`].
    #[inline]
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns the maximum number of entries.
    #[inline]
    pub fn limit(&self) -> usize {
        self.raw.limit()
    }

    /// Sets the maximum number of entries, evicting the least recently used
    /// entries above it.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is 0.
    #[inline]
    pub fn set_limit(&mut self, limit: usize) {
        self.raw.set_limit(limit);
    }

    /// Returns the number of entries in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of entries the map can hold without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.tuning().max_load(self.raw.bits())
    }

    /// Returns the number of probes that met suspected hash flooding.
    #[inline]
    pub fn attacks(&self) -> usize {
        self.raw.attacks()
    }

    /// Returns the least recently used entry, without touching it.
    #[inline]
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }

    /// Removes and returns the least recently used entry.
    #[inline]
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let i = self.raw.first_slot()?;
        Some(self.raw.remove_at(i))
    }

    /// Removes up to `n` of the least recently used entries, returning the
    /// number removed.
    #[inline]
    pub fn evict(&mut self, n: usize) -> usize {
        self.raw.evict(n)
    }

    /// Removes all entries, keeping the allocated memory.
    #[inline]
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Shrinks the capacity of the map as much as possible.
    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.raw.compact();
    }

    /// Retains only the entries for which the predicate returns `true`.
    #[inline]
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.raw.retain(f);
    }

    /// An iterator from the least to the most recently used entry.
    ///
    /// Iterating does not touch the entries.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V, Lru> {
        Iter {
            raw: self.raw.iter(),
        }
    }

    /// A mutable iterator from the least to the most recently used entry.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, Lru> {
        IterMut {
            raw: self.raw.iter_mut(),
        }
    }

    /// An iterator over the keys, least recently used first.
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V, Lru> {
        Keys { iter: self.iter() }
    }

    /// An iterator over the values, least recently used first.
    #[inline]
    pub fn values(&self) -> Values<'_, K, V, Lru> {
        Values { iter: self.iter() }
    }

    /// Returns the entry after `cursor`, or the least recently used entry.
    ///
    /// Stepping never touches entries.
    #[inline]
    pub fn get_next(&self, cursor: Option<Cursor>) -> Option<(Cursor, &K, &V)> {
        self.raw.get_next(cursor)
    }

    /// Returns the entry before `cursor`, or the most recently used entry.
    #[inline]
    pub fn get_prev(&self, cursor: Option<Cursor>) -> Option<(Cursor, &K, &V)> {
        self.raw.get_prev(cursor)
    }

    /// Calls `f` on the entries starting at the position `start_at`, negative
    /// positions counting from the most recently used end.
    #[inline]
    pub fn each<F>(&self, start_at: isize, f: F) -> usize
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        self.raw.each(start_at, f)
    }
}

impl<K, V, S> LruMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash<Q: Hash + ?Sized>(&self, key: &Q) -> u64 {
        self.hasher.hash_one(key)
    }

    /// Returns `true` if the map contains the key. Does not touch the entry.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.peek(key).is_some()
    }

    /// Returns a reference to the value of the key, marking it as the most
    /// recently used entry.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.get_mut(key).map(|v| &*v)
    }

    /// Returns a mutable reference to the value of the key, marking it as the
    /// most recently used entry.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let hash = self.hash(key);
        self.raw.touch(hash, |k| key.equivalent(k)).map(|(_, v)| v)
    }

    /// Returns a reference to the value of the key without touching it.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.raw
            .get(self.hash(key), |k| key.equivalent(k))
            .map(|(_, v)| v)
    }

    /// Inserts a key-value pair, marking it as the most recently used entry.
    ///
    /// Returns the old value if the key was present. Otherwise, if the map is
    /// full, the least recently used entry is evicted to make room.
    ///
    /// # Panics
    ///
    /// Panics if the map cannot make room for the entry, see
    /// [`LruMap::insert_fallible`].
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash(&key);
        self.raw
            .insert(hash, key, value)
            .unwrap_or_else(|err| err.raise())
    }

    /// Inserts a key-value pair, returning an error instead of panicking if
    /// the map cannot make room for it.
    ///
    /// On failure the key and value are dropped, and no entry is evicted.
    #[inline]
    pub fn insert_fallible(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        let hash = self.hash(&key);
        self.raw.insert(hash, key, value)
    }

    /// Returns the value of the key, inserting the result of `f` if the key
    /// is absent. Either way the entry becomes the most recently used.
    #[inline]
    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.hash(&key);
        if let Some(i) = self.raw.find(hash, |k| *k == key) {
            self.raw.promote(i);
            return &mut self.raw.live_mut(i).value;
        }

        match self.raw.insert_entry(hash, key, f(), false) {
            Ok((i, _)) => &mut self.raw.live_mut(i).value,
            Err(err) => err.raise(),
        }
    }

    /// Removes a key from the map, returning its value if it was present.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if it
    /// was present.
    #[inline]
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let hash = self.hash(key);
        self.raw.remove(hash, |k| key.equivalent(k))
    }

    /// Reserves capacity for at least `additional` more entries.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds the largest table size.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.raw.reserve(additional) {
            err.raise();
        }
    }

    /// Tries to reserve capacity for at least `additional` more entries.
    #[inline]
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.raw.reserve(additional)
    }
}

impl<K, V, S> Extend<(K, V)> for LruMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> fmt::Debug for LruMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a LruMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, Lru>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
