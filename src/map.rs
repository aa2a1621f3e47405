use crate::lru::LruMap;
use crate::raw::{
    self, AttackHook, Cursor, InsertResult, Insertion, Order, Passive, RawMap, Tuning, Unordered,
};
use crate::{Equivalent, Error, OccupiedError, TryInsertError};

use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::{ControlFlow, Index};

/// An open-addressing hash map.
///
/// The ordering policy `O` decides the iteration order. The default,
/// [`Unordered`], iterates in table order. [`OrderedMap`] iterates in
/// insertion order, and is built with [`HashMap::builder`] and
/// [`HashMapBuilder::ordered`], or with [`Default`].
///
/// See the [crate-level documentation](crate) for details.
pub struct HashMap<K, V, S = RandomState, O: Passive = Unordered> {
    raw: RawMap<K, V, O>,
    hasher: S,
}

/// A hash map that iterates in insertion order.
///
/// Overwriting the value of an existing key keeps its position.
///
/// # Examples
///
/// ```
/// use probemap::OrderedMap;
///
/// let mut map: OrderedMap<&str, i32> = OrderedMap::default();
/// map.insert("b", 1);
/// map.insert("a", 2);
/// map.insert("b", 3);
///
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, ["b", "a"]);
/// ```
pub type OrderedMap<K, V, S = RandomState> = HashMap<K, V, S, Insertion>;

/// A builder for a [`HashMap`].
///
/// # Examples
///
/// ```rust
/// use probemap::{HashMap, Tuning};
/// use std::collections::hash_map::RandomState;
///
/// let map: HashMap<i32, i32> = HashMap::builder()
///     // Set the initial capacity.
///     .capacity(2048)
///     // Set the hasher.
///     .hasher(RandomState::new())
///     // Scan tables of up to 16 slots linearly.
///     .tuning(Tuning { array_log_limit: 4, ..Tuning::default() })
///     // Construct the hash map.
///     .build();
/// ```
pub struct HashMapBuilder<K, V, S = RandomState, O = Unordered> {
    hasher: S,
    capacity: usize,
    tuning: Tuning,
    attack_hook: Option<AttackHook>,
    _kv: PhantomData<(K, V, O)>,
}

impl<K, V, O> HashMapBuilder<K, V, RandomState, O> {
    /// Set the hash builder used to hash keys.
    ///
    /// Warning: `hash_builder` is normally randomly generated, and is designed
    /// to allow HashMaps to be resistant to attacks that cause many collisions
    /// and very poor performance. Setting it manually using this function can
    /// expose a DoS attack vector.
    ///
    /// The `hash_builder` passed should implement the [`BuildHasher`] trait for
    /// the HashMap to be useful, see its documentation for details.
    pub fn hasher<S>(self, hasher: S) -> HashMapBuilder<K, V, S, O> {
        HashMapBuilder {
            hasher,
            capacity: self.capacity,
            tuning: self.tuning,
            attack_hook: self.attack_hook,
            _kv: PhantomData,
        }
    }
}

impl<K, V, S> HashMapBuilder<K, V, S, Unordered> {
    /// Iterate the map in insertion order.
    pub fn ordered(self) -> HashMapBuilder<K, V, S, Insertion> {
        HashMapBuilder {
            hasher: self.hasher,
            capacity: self.capacity,
            tuning: self.tuning,
            attack_hook: self.attack_hook,
            _kv: PhantomData,
        }
    }

    /// Construct an [`LruMap`] holding at most `limit` entries, using the
    /// configured options.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is 0.
    pub fn build_lru(self, limit: usize) -> LruMap<K, V, S> {
        let raw = self.raw();
        LruMap::from_raw(raw, limit, self.hasher)
    }
}

impl<K, V, S, O> HashMapBuilder<K, V, S, O> {
    /// Set the initial capacity of the map.
    ///
    /// The map is able to hold at least `capacity` entries before growing.
    /// If `capacity` is 0, the map will not allocate.
    pub fn capacity(self, capacity: usize) -> Self {
        HashMapBuilder { capacity, ..self }
    }

    /// Set the probing and sizing constants of the map. See [`Tuning`] for details.
    pub fn tuning(self, tuning: Tuning) -> Self {
        HashMapBuilder { tuning, ..self }
    }

    /// Set the callback notified of suspected hash flooding.
    ///
    /// By default, events are written to stderr.
    pub fn attack_hook(self, hook: AttackHook) -> Self {
        HashMapBuilder {
            attack_hook: Some(hook),
            ..self
        }
    }

    fn raw<P: Order>(&self) -> RawMap<K, V, P> {
        let mut raw =
            RawMap::with_capacity(self.capacity, self.tuning).unwrap_or_else(|err| err.raise());

        if let Some(hook) = self.attack_hook {
            raw.set_attack_hook(hook);
        }

        raw
    }
}

impl<K, V, S, O: Passive> HashMapBuilder<K, V, S, O> {
    /// Construct a [`HashMap`] from the builder, using the configured options.
    pub fn build(self) -> HashMap<K, V, S, O> {
        HashMap {
            raw: self.raw(),
            hasher: self.hasher,
        }
    }
}

impl<K, V, S, O> fmt::Debug for HashMapBuilder<K, V, S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashMapBuilder")
            .field("capacity", &self.capacity)
            .field("tuning", &self.tuning)
            .finish()
    }
}

impl<K, V> HashMap<K, V> {
    /// Creates an empty `HashMap`.
    ///
    /// The hash map is initially created with a capacity of 0, so it will not allocate until it
    /// is first inserted into.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashMap;
    /// let map: HashMap<&str, i32> = HashMap::new();
    /// ```
    pub fn new() -> HashMap<K, V> {
        HashMap::with_capacity_and_hasher(0, RandomState::new())
    }

    /// Creates an empty `HashMap` with the specified capacity.
    ///
    /// The map is able to hold at least `capacity` entries before growing.
    /// If `capacity` is 0, the hash map will not allocate.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashMap;
    /// let map: HashMap<&str, i32> = HashMap::with_capacity(10);
    /// assert!(map.capacity() >= 10);
    /// ```
    pub fn with_capacity(capacity: usize) -> HashMap<K, V> {
        HashMap::with_capacity_and_hasher(capacity, RandomState::new())
    }

    /// Returns a builder for a `HashMap`.
    ///
    /// The builder can be used for more complex configuration, such as
    /// insertion ordering, custom [`Tuning`], or an attack hook.
    pub fn builder() -> HashMapBuilder<K, V> {
        HashMapBuilder {
            capacity: 0,
            hasher: RandomState::default(),
            tuning: Tuning::default(),
            attack_hook: None,
            _kv: PhantomData,
        }
    }
}

impl<K, V, S, O> Default for HashMap<K, V, S, O>
where
    S: Default,
    O: Passive,
{
    fn default() -> Self {
        HashMap::with_hasher(S::default())
    }
}

impl<K, V, S, O: Passive> HashMap<K, V, S, O> {
    /// Creates an empty `HashMap` which will use the given hash builder to hash
    /// keys.
    ///
    /// Warning: `hash_builder` is normally randomly generated, and is designed
    /// to allow HashMaps to be resistant to attacks that cause many collisions
    /// and very poor performance. Setting it manually using this function can
    /// expose a DoS attack vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashMap;
    /// use std::collections::hash_map::RandomState;
    ///
    /// let s = RandomState::new();
    /// let mut map: HashMap<i32, i32, RandomState> = HashMap::with_hasher(s);
    /// map.insert(1, 2);
    /// ```
    pub fn with_hasher(hash_builder: S) -> HashMap<K, V, S, O> {
        HashMap::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty `HashMap` with at least the specified capacity, using
    /// `hash_builder` to hash the keys.
    ///
    /// # Panics
    ///
    /// Panics if the capacity exceeds the largest table size.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> HashMap<K, V, S, O> {
        HashMap {
            raw: RawMap::with_capacity(capacity, Tuning::default())
                .unwrap_or_else(|err| err.raise()),
            hasher: hash_builder,
        }
    }

    /// Returns a reference to the map's [`BuildHasher`].
    #[inline]
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns the underlying table.
    ///
    /// The table can be probed with hashes computed by [`HashMap::hasher`].
    #[inline]
    pub fn raw(&self) -> &RawMap<K, V, O> {
        &self.raw
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// assert!(map.len() == 2);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map is empty. Otherwise returns `false`.
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

    /// Clears the map, removing all key-value pairs. Keeps the allocated memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Shrinks the capacity of the map as much as possible.
    ///
    /// An empty map releases its memory.
    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.raw.compact();
    }

    /// Removes up to `n` entries, returning the number removed.
    ///
    /// Ordered maps remove their oldest entries. Unordered maps remove
    /// entries at pseudo-random positions.
    #[inline]
    pub fn evict(&mut self, n: usize) -> usize {
        self.raw.evict(n)
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all pairs `(k, v)` for which `f(&k, &mut v)` returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashMap;
    ///
    /// let mut map: HashMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert_eq!(map.len(), 4);
    /// ```
    #[inline]
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.raw.retain(f);
    }

    /// An iterator visiting all key-value pairs in iteration order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V, O> {
        Iter {
            raw: self.raw.iter(),
        }
    }

    /// An iterator visiting all key-value pairs, with mutable references to the values.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, O> {
        IterMut {
            raw: self.raw.iter_mut(),
        }
    }

    /// An iterator visiting all keys in iteration order.
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V, O> {
        Keys { iter: self.iter() }
    }

    /// An iterator visiting all values in iteration order.
    #[inline]
    pub fn values(&self) -> Values<'_, K, V, O> {
        Values { iter: self.iter() }
    }

    /// An iterator visiting all values mutably.
    #[inline]
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V, O> {
        ValuesMut {
            iter: self.iter_mut(),
        }
    }

    /// Returns the entry after `cursor`, or the first entry.
    ///
    /// The map may be modified between calls, see [`Cursor`].
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::OrderedMap;
    ///
    /// let mut map: OrderedMap<i32, i32> = (0..4).map(|x| (x, x)).collect();
    ///
    /// let (cursor, _, _) = map.get_next(None).unwrap();
    /// let (cursor, &k, _) = map.get_next(Some(cursor)).unwrap();
    /// assert_eq!(k, 1);
    ///
    /// // Removing the entry under the cursor seeks by position instead.
    /// map.remove(&1);
    /// let (_, &k, _) = map.get_next(Some(cursor)).unwrap();
    /// assert_eq!(k, 3);
    /// ```
    #[inline]
    pub fn get_next(&self, cursor: Option<Cursor>) -> Option<(Cursor, &K, &V)> {
        self.raw.get_next(cursor)
    }

    /// Returns the entry before `cursor`, or the last entry.
    #[inline]
    pub fn get_prev(&self, cursor: Option<Cursor>) -> Option<(Cursor, &K, &V)> {
        self.raw.get_prev(cursor)
    }

    /// Calls `f` on the entries starting at the position `start_at`, negative
    /// positions counting from the end.
    ///
    /// Returns the number of entries `f` was called on.
    #[inline]
    pub fn each<F>(&self, start_at: isize, f: F) -> usize
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        self.raw.each(start_at, f)
    }
}

impl<K, V, S, O> HashMap<K, V, S, O>
where
    K: Hash + Eq,
    S: BuildHasher,
    O: Passive,
{
    #[inline]
    fn hash<Q: Hash + ?Sized>(&self, key: &Q) -> u64 {
        self.hasher.hash_one(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// The key may be any borrowed form of the map's key type, but
    /// [`Hash`] and [`Eq`] on the borrowed form *must* match those for
    /// the key type.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.contains_key(&1), true);
    /// assert_eq!(map.contains_key(&2), false);
    /// ```
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    #[inline]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.raw.get(self.hash(key), |k| key.equivalent(k))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let hash = self.hash(key);
        self.raw.get_mut(hash, |k| key.equivalent(k)).map(|(_, v)| v)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, [`None`] is returned.
    ///
    /// If the map did have this key present, the value is updated, and the old
    /// value is returned. The key is not updated, though; this matters for
    /// types that can be `==` without being identical. See the [standard library
    /// documentation] for details.
    ///
    /// [standard library documentation]: https://doc.rust-lang.org/std/collections/index.html#insert-and-complex-keys
    ///
    /// # Panics
    ///
    /// Panics if the map cannot make room for the entry, see
    /// [`HashMap::insert_fallible`].
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.insert(37, "b");
    /// assert_eq!(map.insert(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// ```
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash(&key);
        self.raw
            .insert(hash, key, value)
            .unwrap_or_else(|err| err.raise())
    }

    /// Inserts a key-value pair into the map, returning an error instead of
    /// panicking if the map cannot make room for it.
    ///
    /// On success this behaves like [`HashMap::insert`]. On failure the key
    /// and value are dropped and the map is left unchanged. Besides running
    /// out of memory, this happens when so many keys share a hash that the
    /// table has no room for them, see [`Error::ProbeExhausted`].
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert_fallible(37, "a"), Ok(None));
    /// assert_eq!(map.insert_fallible(37, "b"), Ok(Some("a")));
    /// ```
    #[inline]
    pub fn insert_fallible(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        let hash = self.hash(&key);
        self.raw.insert(hash, key, value)
    }

    /// Tries to insert a key-value pair into the map, and returns
    /// a reference to the value that was inserted.
    ///
    /// If the map already had this key present, nothing is updated, and
    /// an error containing the existing value is returned. If the map
    /// cannot make room for the entry, the error is returned instead of
    /// panicking.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::{HashMap, TryInsertError};
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.try_insert(37, "a").unwrap(), &"a");
    ///
    /// match map.try_insert(37, "b") {
    ///     Err(TryInsertError::Occupied(err)) => {
    ///         assert_eq!(err.current, &"a");
    ///         assert_eq!(err.not_inserted, "b");
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    #[inline]
    pub fn try_insert(&mut self, key: K, value: V) -> Result<&mut V, TryInsertError<'_, V>> {
        let hash = self.hash(&key);
        let (i, result) = self
            .raw
            .insert_entry(hash, key, value, false)
            .map_err(TryInsertError::Failed)?;

        match result {
            InsertResult::Occupied(not_inserted) => Err(TryInsertError::Occupied(OccupiedError {
                current: &self.raw.live(i).value,
                not_inserted,
            })),
            _ => Ok(&mut self.raw.live_mut(i).value),
        }
    }

    /// Returns a reference to the value corresponding to the key, or inserts
    /// `value` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// *map.get_or_insert("a", 0) += 1;
    /// *map.get_or_insert("a", 0) += 1;
    /// assert_eq!(map[&"a"], 2);
    /// ```
    #[inline]
    pub fn get_or_insert(&mut self, key: K, value: V) -> &mut V {
        let hash = self.hash(&key);
        match self.raw.insert_if_missing(hash, key, value) {
            Ok((value, _)) => value,
            Err(err) => err.raise(),
        }
    }

    /// Returns a reference to the value corresponding to the key, or inserts
    /// the result of `f` if the key is absent.
    ///
    /// `f` is only called when the key is absent.
    #[inline]
    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.hash(&key);
        if let Some(i) = self.raw.find(hash, |k| *k == key) {
            return &mut self.raw.live_mut(i).value;
        }

        match self.raw.insert_entry(hash, key, f(), false) {
            Ok((i, _)) => &mut self.raw.live_mut(i).value,
            Err(err) => err.raise(),
        }
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
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
    ///
    /// On failure the map is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::{Error, HashMap};
    ///
    /// let mut map: HashMap<i32, i32> = HashMap::new();
    /// assert!(map.try_reserve(10).is_ok());
    /// assert_eq!(map.try_reserve(usize::MAX), Err(Error::CapacityOverflow));
    /// ```
    #[inline]
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.raw.reserve(additional)
    }
}

impl<K, V, S, O> PartialEq for HashMap<K, V, S, O>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
    O: Passive,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter()
            .all(|(key, value)| other.get(key).map_or(false, |v| *value == *v))
    }
}

impl<K, V, S, O> Eq for HashMap<K, V, S, O>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
    O: Passive,
{
}

impl<K, V, S, O> fmt::Debug for HashMap<K, V, S, O>
where
    K: fmt::Debug,
    V: fmt::Debug,
    O: Passive,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, Q, V, S, O> Index<&Q> for HashMap<K, V, S, O>
where
    K: Hash + Eq,
    Q: Equivalent<K> + Hash + ?Sized,
    S: BuildHasher,
    O: Passive,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, S, O> Extend<(K, V)> for HashMap<K, V, S, O>
where
    K: Hash + Eq,
    S: BuildHasher,
    O: Passive,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        // from `hashbrown::HashMap::extend`:
        // Keys may be already present or show multiple times in the iterator.
        // Reserve the entire hint lower bound if the map is empty.
        // Otherwise reserve half the hint (rounded up), so the map
        // will only resize twice in the worst case.
        let iter = iter.into_iter();
        let reserve = if self.is_empty() {
            iter.size_hint().0
        } else {
            (iter.size_hint().0 + 1) / 2
        };

        self.reserve(reserve);

        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, S, O> Extend<(&'a K, &'a V)> for HashMap<K, V, S, O>
where
    K: Copy + Hash + Eq,
    V: Copy,
    S: BuildHasher,
    O: Passive,
{
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        self.extend(iter.into_iter().map(|(&k, &v)| (k, v)));
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for HashMap<K, V, RandomState>
where
    K: Hash + Eq,
{
    fn from(arr: [(K, V); N]) -> Self {
        HashMap::from_iter(arr)
    }
}

impl<K, V, S, O> FromIterator<(K, V)> for HashMap<K, V, S, O>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
    O: Passive,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();

        let mut map = HashMap::with_capacity_and_hasher(lower, S::default());
        for (key, value) in iter {
            map.insert(key, value);
        }

        map
    }
}

impl<'a, K, V, S, O: Passive> IntoIterator for &'a HashMap<K, V, S, O> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, O>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S, O: Passive> IntoIterator for &'a mut HashMap<K, V, S, O> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V, O>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An iterator over a map's entries.
///
/// This struct is created by the [`iter`](HashMap::iter) method on [`HashMap`]. See its documentation for details.
pub struct Iter<'a, K, V, O: Order = Unordered> {
    pub(crate) raw: raw::Iter<'a, K, V, O>,
}

impl<'a, K, V, O: Order> Iterator for Iter<'a, K, V, O> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<K, V, O: Order> DoubleEndedIterator for Iter<'_, K, V, O> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.raw.next_back()
    }
}

impl<K, V, O: Order> ExactSizeIterator for Iter<'_, K, V, O> {}
impl<K, V, O: Order> FusedIterator for Iter<'_, K, V, O> {}

impl<K, V, O: Order> Clone for Iter<'_, K, V, O> {
    #[inline]
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw.clone(),
        }
    }
}

impl<K, V, O> fmt::Debug for Iter<'_, K, V, O>
where
    K: fmt::Debug,
    V: fmt::Debug,
    O: Order,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// A mutable iterator over a map's entries.
///
/// This struct is created by the [`iter_mut`](HashMap::iter_mut) method on [`HashMap`].
pub struct IterMut<'a, K, V, O: Order = Unordered> {
    pub(crate) raw: raw::IterMut<'a, K, V, O>,
}

impl<'a, K, V, O: Order> Iterator for IterMut<'a, K, V, O> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<K, V, O: Order> DoubleEndedIterator for IterMut<'_, K, V, O> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.raw.next_back()
    }
}

impl<K, V, O: Order> ExactSizeIterator for IterMut<'_, K, V, O> {}
impl<K, V, O: Order> FusedIterator for IterMut<'_, K, V, O> {}

/// An iterator over a map's keys.
///
/// This struct is created by the [`keys`](HashMap::keys) method on [`HashMap`]. See its documentation for details.
pub struct Keys<'a, K, V, O: Order = Unordered> {
    pub(crate) iter: Iter<'a, K, V, O>,
}

impl<'a, K, V, O: Order> Iterator for Keys<'a, K, V, O> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V, O: Order> DoubleEndedIterator for Keys<'_, K, V, O> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(k, _)| k)
    }
}

impl<K, V, O: Order> ExactSizeIterator for Keys<'_, K, V, O> {}
impl<K, V, O: Order> FusedIterator for Keys<'_, K, V, O> {}

impl<K, V, O: Order> Clone for Keys<'_, K, V, O> {
    #[inline]
    fn clone(&self) -> Self {
        Keys {
            iter: self.iter.clone(),
        }
    }
}

impl<K: fmt::Debug, V, O: Order> fmt::Debug for Keys<'_, K, V, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over a map's values.
///
/// This struct is created by the [`values`](HashMap::values) method on [`HashMap`]. See its documentation for details.
pub struct Values<'a, K, V, O: Order = Unordered> {
    pub(crate) iter: Iter<'a, K, V, O>,
}

impl<'a, K, V, O: Order> Iterator for Values<'a, K, V, O> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V, O: Order> DoubleEndedIterator for Values<'_, K, V, O> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(_, v)| v)
    }
}

impl<K, V, O: Order> ExactSizeIterator for Values<'_, K, V, O> {}
impl<K, V, O: Order> FusedIterator for Values<'_, K, V, O> {}

impl<K, V, O: Order> Clone for Values<'_, K, V, O> {
    #[inline]
    fn clone(&self) -> Self {
        Values {
            iter: self.iter.clone(),
        }
    }
}

impl<K, V: fmt::Debug, O: Order> fmt::Debug for Values<'_, K, V, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// A mutable iterator over a map's values.
///
/// This struct is created by the [`values_mut`](HashMap::values_mut) method on [`HashMap`].
pub struct ValuesMut<'a, K, V, O: Order = Unordered> {
    pub(crate) iter: IterMut<'a, K, V, O>,
}

impl<'a, K, V, O: Order> Iterator for ValuesMut<'a, K, V, O> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V, O: Order> DoubleEndedIterator for ValuesMut<'_, K, V, O> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|(_, v)| v)
    }
}

impl<K, V, O: Order> ExactSizeIterator for ValuesMut<'_, K, V, O> {}
impl<K, V, O: Order> FusedIterator for ValuesMut<'_, K, V, O> {}
