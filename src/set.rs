use crate::raw::{self, AttackHook, Cursor, Insertion, Order, Passive, RawMap, Tuning, Unordered};
use crate::{Equivalent, Error};

use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::ControlFlow;

/// An open-addressing hash set.
///
/// A set is a [`HashMap`](crate::HashMap) whose values are the keys
/// themselves. The ordering policy `O` works the same way, see
/// [`OrderedSet`].
pub struct HashSet<K, S = RandomState, O: Passive = Unordered> {
    raw: RawMap<K, (), O>,
    hasher: S,
}

/// A hash set that iterates in insertion order.
///
/// # Examples
///
/// ```
/// use probemap::OrderedSet;
///
/// let mut set: OrderedSet<i32> = OrderedSet::default();
/// set.insert(3);
/// set.insert(1);
/// set.insert(2);
/// set.insert(1);
///
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 1, 2]);
/// ```
pub type OrderedSet<K, S = RandomState> = HashSet<K, S, Insertion>;

/// A builder for a [`HashSet`].
///
/// # Examples
///
/// ```rust
/// use probemap::HashSet;
/// use std::collections::hash_map::RandomState;
///
/// let set: HashSet<i32> = HashSet::builder()
///     // Set the initial capacity.
///     .capacity(2048)
///     // Set the hasher.
///     .hasher(RandomState::new())
///     // Construct the hash set.
///     .build();
/// ```
pub struct HashSetBuilder<K, S = RandomState, O = Unordered> {
    hasher: S,
    capacity: usize,
    tuning: Tuning,
    attack_hook: Option<AttackHook>,
    _kv: PhantomData<(K, O)>,
}

impl<K, O> HashSetBuilder<K, RandomState, O> {
    /// Set the hash builder used to hash keys.
    ///
    /// Warning: `hash_builder` is normally randomly generated, and is designed
    /// to allow HashSets to be resistant to attacks that cause many collisions
    /// and very poor performance. Setting it manually using this function can
    /// expose a DoS attack vector.
    pub fn hasher<S>(self, hasher: S) -> HashSetBuilder<K, S, O> {
        HashSetBuilder {
            hasher,
            capacity: self.capacity,
            tuning: self.tuning,
            attack_hook: self.attack_hook,
            _kv: PhantomData,
        }
    }
}

impl<K, S> HashSetBuilder<K, S, Unordered> {
    /// Iterate the set in insertion order.
    pub fn ordered(self) -> HashSetBuilder<K, S, Insertion> {
        HashSetBuilder {
            hasher: self.hasher,
            capacity: self.capacity,
            tuning: self.tuning,
            attack_hook: self.attack_hook,
            _kv: PhantomData,
        }
    }
}

impl<K, S, O> HashSetBuilder<K, S, O> {
    /// Set the initial capacity of the set.
    ///
    /// The set is able to hold at least `capacity` elements before growing.
    /// If `capacity` is 0, the hash set will not allocate.
    pub fn capacity(self, capacity: usize) -> Self {
        HashSetBuilder { capacity, ..self }
    }

    /// Set the probing and sizing constants of the set. See [`Tuning`] for details.
    pub fn tuning(self, tuning: Tuning) -> Self {
        HashSetBuilder { tuning, ..self }
    }

    /// Set the callback notified of suspected hash flooding.
    pub fn attack_hook(self, hook: AttackHook) -> Self {
        HashSetBuilder {
            attack_hook: Some(hook),
            ..self
        }
    }
}

impl<K, S, O: Passive> HashSetBuilder<K, S, O> {
    /// Construct a [`HashSet`] from the builder, using the configured options.
    pub fn build(self) -> HashSet<K, S, O> {
        let mut raw =
            RawMap::with_capacity(self.capacity, self.tuning).unwrap_or_else(|err| err.raise());

        if let Some(hook) = self.attack_hook {
            raw.set_attack_hook(hook);
        }

        HashSet {
            raw,
            hasher: self.hasher,
        }
    }
}

impl<K, S, O> fmt::Debug for HashSetBuilder<K, S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashSetBuilder")
            .field("capacity", &self.capacity)
            .field("tuning", &self.tuning)
            .finish()
    }
}

impl<K> HashSet<K> {
    /// Creates an empty `HashSet`.
    ///
    /// The set is initially created with a capacity of 0, so it will not allocate
    /// until it is first inserted into.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashSet;
    /// let set: HashSet<&str> = HashSet::new();
    /// ```
    pub fn new() -> HashSet<K> {
        HashSet::with_capacity_and_hasher(0, RandomState::new())
    }

    /// Creates an empty `HashSet` with the specified capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashSet;
    /// let set: HashSet<&str> = HashSet::with_capacity(10);
    /// assert!(set.capacity() >= 10);
    /// ```
    pub fn with_capacity(capacity: usize) -> HashSet<K> {
        HashSet::with_capacity_and_hasher(capacity, RandomState::new())
    }

    /// Returns a builder for a `HashSet`.
    pub fn builder() -> HashSetBuilder<K> {
        HashSetBuilder {
            capacity: 0,
            hasher: RandomState::default(),
            tuning: Tuning::default(),
            attack_hook: None,
            _kv: PhantomData,
        }
    }
}

impl<K, S, O> Default for HashSet<K, S, O>
where
    S: Default,
    O: Passive,
{
    fn default() -> Self {
        HashSet::with_hasher(S::default())
    }
}

impl<K, S, O: Passive> HashSet<K, S, O> {
    /// Creates an empty `HashSet` which will use the given hash builder to hash
    /// keys.
    pub fn with_hasher(hash_builder: S) -> HashSet<K, S, O> {
        HashSet::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty `HashSet` with at least the specified capacity, using
    /// `hash_builder` to hash the keys.
    ///
    /// # Panics
    ///
    /// Panics if the capacity exceeds the largest table size.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> HashSet<K, S, O> {
        HashSet {
            raw: RawMap::with_capacity(capacity, Tuning::default())
                .unwrap_or_else(|err| err.raise()),
            hasher: hash_builder,
        }
    }

    /// Returns a reference to the set's [`BuildHasher`].
    #[inline]
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns the number of elements in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set is empty. Otherwise returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert!(set.is_empty());
    /// set.insert("a");
    /// assert!(!set.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of elements the set can hold without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.tuning().max_load(self.raw.bits())
    }

    /// Returns the number of probes that met suspected hash flooding.
    #[inline]
    pub fn attacks(&self) -> usize {
        self.raw.attacks()
    }

    /// Clears the set, removing all values.
    #[inline]
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Shrinks the capacity of the set as much as possible.
    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.raw.compact();
    }

    /// Removes up to `n` elements, returning the number removed.
    #[inline]
    pub fn evict(&mut self, n: usize) -> usize {
        self.raw.evict(n)
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all elements `e` for which `f(&e)` returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashSet;
    ///
    /// let mut set: HashSet<i32> = (0..8).collect();
    /// set.retain(|&e| e % 2 == 0);
    /// assert_eq!(set.len(), 4);
    /// ```
    #[inline]
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.raw.retain(|k, _| f(k));
    }

    /// An iterator visiting all elements in iteration order.
    #[inline]
    pub fn iter(&self) -> SetIter<'_, K, O> {
        SetIter {
            raw: self.raw.iter(),
        }
    }

    /// Returns the element after `cursor`, or the first element.
    #[inline]
    pub fn get_next(&self, cursor: Option<Cursor>) -> Option<(Cursor, &K)> {
        self.raw.get_next(cursor).map(|(c, k, _)| (c, k))
    }

    /// Returns the element before `cursor`, or the last element.
    #[inline]
    pub fn get_prev(&self, cursor: Option<Cursor>) -> Option<(Cursor, &K)> {
        self.raw.get_prev(cursor).map(|(c, k, _)| (c, k))
    }

    /// Calls `f` on the elements starting at the position `start_at`, negative
    /// positions counting from the end.
    #[inline]
    pub fn each<F>(&self, start_at: isize, mut f: F) -> usize
    where
        F: FnMut(&K) -> ControlFlow<()>,
    {
        self.raw.each(start_at, |k, _| f(k))
    }
}

impl<K, S, O> HashSet<K, S, O>
where
    K: Hash + Eq,
    S: BuildHasher,
    O: Passive,
{
    #[inline]
    fn hash<Q: Hash + ?Sized>(&self, key: &Q) -> u64 {
        self.hasher.hash_one(key)
    }

    /// Returns `true` if the set contains a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.insert(1);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&2), false);
    /// ```
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns a reference to the value in the set equal to the given value.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.raw
            .get(self.hash(key), |k| key.equivalent(k))
            .map(|(k, _)| k)
    }

    /// Adds a value to the set.
    ///
    /// If the set did not have this value present, `true` is returned.
    ///
    /// If the set did have this value present, `false` is returned, and the
    /// stored value is not updated.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert_eq!(set.insert(37), true);
    /// assert_eq!(set.insert(37), false);
    /// assert_eq!(set.get(&37), Some(&37));
    /// ```
    #[inline]
    pub fn insert(&mut self, key: K) -> bool {
        let hash = self.hash(&key);
        match self.raw.insert_if_missing(hash, key, ()) {
            Ok((_, rejected)) => rejected.is_none(),
            Err(err) => err.raise(),
        }
    }

    /// Adds a value to the set, returning an error instead of panicking if
    /// the set cannot make room for it.
    ///
    /// On success this behaves like [`HashSet::insert`]. On failure the value
    /// is dropped and the set is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert_eq!(set.insert_fallible(37), Ok(true));
    /// assert_eq!(set.insert_fallible(37), Ok(false));
    /// ```
    #[inline]
    pub fn insert_fallible(&mut self, key: K) -> Result<bool, Error> {
        let hash = self.hash(&key);
        let (_, rejected) = self.raw.insert_if_missing(hash, key, ())?;
        Ok(rejected.is_none())
    }

    /// Removes a value from the set. Returns whether the value was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use probemap::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), true);
    /// assert_eq!(set.remove(&1), false);
    /// ```
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes and returns the value in the set equal to the given one.
    #[inline]
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let hash = self.hash(key);
        self.raw.remove(hash, |k| key.equivalent(k)).map(|(k, _)| k)
    }

    /// Reserves capacity for at least `additional` more elements.
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

    /// Tries to reserve capacity for at least `additional` more elements.
    #[inline]
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.raw.reserve(additional)
    }
}

impl<K, S, O> PartialEq for HashSet<K, S, O>
where
    K: Hash + Eq,
    S: BuildHasher,
    O: Passive,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter().all(|key| other.contains(key))
    }
}

impl<K, S, O> Eq for HashSet<K, S, O>
where
    K: Hash + Eq,
    S: BuildHasher,
    O: Passive,
{
}

impl<K, S, O> fmt::Debug for HashSet<K, S, O>
where
    K: fmt::Debug,
    O: Passive,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, S, O> Extend<K> for HashSet<K, S, O>
where
    K: Hash + Eq,
    S: BuildHasher,
    O: Passive,
{
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        // from `hashbrown::HashSet::extend`:
        // Keys may be already present or show multiple times in the iterator.
        // Reserve the entire hint lower bound if the set is empty.
        // Otherwise reserve half the hint (rounded up), so the set
        // will only resize twice in the worst case.
        let iter = iter.into_iter();
        let reserve = if self.is_empty() {
            iter.size_hint().0
        } else {
            (iter.size_hint().0 + 1) / 2
        };

        self.reserve(reserve);

        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K, S, O> Extend<&'a K> for HashSet<K, S, O>
where
    K: Copy + Hash + Eq + 'a,
    S: BuildHasher,
    O: Passive,
{
    fn extend<T: IntoIterator<Item = &'a K>>(&mut self, iter: T) {
        self.extend(iter.into_iter().copied());
    }
}

impl<K, const N: usize> From<[K; N]> for HashSet<K, RandomState>
where
    K: Hash + Eq,
{
    fn from(arr: [K; N]) -> Self {
        HashSet::from_iter(arr)
    }
}

impl<K, S, O> FromIterator<K> for HashSet<K, S, O>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
    O: Passive,
{
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();

        let mut set = HashSet::with_capacity_and_hasher(lower, S::default());
        for key in iter {
            set.insert(key);
        }

        set
    }
}

impl<'a, K, S, O: Passive> IntoIterator for &'a HashSet<K, S, O> {
    type Item = &'a K;
    type IntoIter = SetIter<'a, K, O>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over a set's elements.
///
/// This struct is created by the [`iter`](HashSet::iter) method on [`HashSet`]. See its documentation for details.
pub struct SetIter<'a, K, O: Order = Unordered> {
    raw: raw::Iter<'a, K, (), O>,
}

impl<'a, K, O: Order> Iterator for SetIter<'a, K, O> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<K, O: Order> DoubleEndedIterator for SetIter<'_, K, O> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.raw.next_back().map(|(k, _)| k)
    }
}

impl<K, O: Order> ExactSizeIterator for SetIter<'_, K, O> {}
impl<K, O: Order> FusedIterator for SetIter<'_, K, O> {}

impl<K, O: Order> Clone for SetIter<'_, K, O> {
    #[inline]
    fn clone(&self) -> Self {
        SetIter {
            raw: self.raw.clone(),
        }
    }
}

impl<K: fmt::Debug, O: Order> fmt::Debug for SetIter<'_, K, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
