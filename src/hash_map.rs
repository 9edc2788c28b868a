use core::fmt::Debug;
use core::fmt::Display;

use crate::comparator::DefaultComparator;
use crate::comparator::DefaultEqualityComparator;
use crate::comparator::EqualityComparator;
use crate::entry::Entry;
use crate::entry::KeyEqualityComparator;
use crate::entry::ValueEqualityComparator;
use crate::error::CapacityError;
use crate::hash_set;
use crate::hash_set::HashSet;
use crate::hash_table;
use crate::hash_table::DEFAULT_INITIAL_CAPACITY;
use crate::hash_table::DEFAULT_LOAD_FACTOR;
use crate::object::ObjectEq;
use crate::view::KeySet;
use crate::view::Values;

type EntrySet<K, V, C> = HashSet<Entry<K, V>, KeyEqualityComparator<C>>;

/// A hash map backed by a [`HashSet`] of [`Entry`] values.
///
/// `HashMap<K, V, C>` keeps exactly one entry per distinct key, where "same
/// key" is decided by the key strategy `C`. The backing set compares entries
/// through [`KeyEqualityComparator`], so all sizing, growth and iteration
/// order come from the set.
///
/// Keys and values that may be null are declared as `Option<_>`. A lookup
/// result of `None` means the key is absent; a present key with a null value
/// is `Some(&None)`.
///
/// # Examples
///
/// ```rust
/// use eqhash::HashMap;
///
/// let mut map = HashMap::new();
/// assert_eq!(map.put("a", 1), None);
/// assert_eq!(map.put("b", 2), None);
/// assert_eq!(map.put("a", 3), Some(1));
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get(&"a"), Some(&3));
/// assert!(map.contains_value(&2));
/// assert!(!map.contains_value(&1));
/// ```
pub struct HashMap<K, V, C = DefaultComparator> {
    entries: EntrySet<K, V, C>,
}

impl<K, V, C> Debug for HashMap<K, V, C>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, C> Display for HashMap<K, V, C>
where
    K: Display,
    V: Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("{")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            Display::fmt(entry, f)?;
        }
        f.write_str("}")
    }
}

impl<K, V, C> Clone for HashMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: EqualityComparator<K> + Clone,
{
    /// Deep copy: every entry is re-created from clones of its key and value
    /// and inserted into a fresh backing set.
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<K, V, C> PartialEq for HashMap<K, V, C>
where
    K: ObjectEq,
    V: ObjectEq,
    C: EqualityComparator<K>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.entries
            .iter()
            .all(|e| other.get_entry(e.key()).is_some_and(|o| e == o))
    }
}

impl<K, V, C> Eq for HashMap<K, V, C>
where
    K: ObjectEq,
    V: ObjectEq,
    C: EqualityComparator<K>,
{
}

impl<K: ObjectEq, V> HashMap<K, V> {
    /// Creates an empty map with 16 buckets, load factor 0.75 and the default
    /// key strategy.
    pub fn new() -> Self {
        Self::with_comparator(DefaultEqualityComparator::instance())
    }

    /// Creates an empty map with at least `capacity` buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashMap;
    ///
    /// let map: HashMap<&str, i32> = HashMap::with_capacity(20);
    /// assert_eq!(map.capacity(), 32);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_load_factor(capacity, DEFAULT_LOAD_FACTOR)
    }

    /// Creates an empty map with at least `capacity` buckets and the given
    /// load factor. An invalid load factor falls back to 0.75.
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Self {
        Self::with_capacity_load_factor_and_comparator(
            capacity,
            load_factor,
            DefaultEqualityComparator::instance(),
        )
    }

    /// Fallible form of
    /// [`with_capacity_and_load_factor`](Self::with_capacity_and_load_factor).
    pub fn try_with_capacity_and_load_factor(
        capacity: usize,
        load_factor: f32,
    ) -> Result<Self, CapacityError> {
        Ok(Self {
            entries: HashSet::try_with_capacity_load_factor_and_comparator(
                capacity,
                load_factor,
                KeyEqualityComparator::new(DefaultEqualityComparator::instance()),
            )?,
        })
    }
}

impl<K, V, C> HashMap<K, V, C> {
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the bucket count of the backing set.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Removes every entry. The capacity is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the backing set of entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::Entry;
    /// use eqhash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.put("k", 1);
    /// assert!(map.entry_set().contains(&Entry::new("k", 99)));
    /// ```
    pub fn entry_set(&self) -> &EntrySet<K, V, C> {
        &self.entries
    }

    /// Returns the key strategy.
    pub fn comparator(&self) -> &C {
        self.entries.comparator().inner()
    }

    /// Returns an iterator over `(key, value)` pairs in the backing set's
    /// order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Returns an iterator over `(key, mutable value)` pairs.
    ///
    /// Each yielded entry drops its cached hash code, since the value may be
    /// changed through the reference.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.entries.iter_mut(),
        }
    }

    /// Keeps only the entries for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&K, &V) -> bool) {
        self.entries.retain(|e| f(e.key(), e.value()));
    }

    /// Returns a read-only view of the keys.
    pub fn key_set(&self) -> KeySet<&Self> {
        KeySet::new(self)
    }

    /// Returns a view of the keys that can remove entries from the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = [(1, "a"), (2, "b"), (3, "c")].into_iter().collect();
    /// map.key_set_mut().retain(|k| *k != 2);
    /// assert_eq!(map.len(), 2);
    /// assert!(!map.contains_key(&2));
    /// ```
    pub fn key_set_mut(&mut self) -> KeySet<&mut Self> {
        KeySet::new(self)
    }

    /// Returns a read-only view of the values.
    pub fn values(&self) -> Values<&Self> {
        Values::new(self)
    }

    /// Returns a view of the values that can remove entries from the map.
    pub fn values_mut(&mut self) -> Values<&mut Self> {
        Values::new(self)
    }

    /// Returns the bucket statistics of the backing set.
    #[cfg(any(test, feature = "stats"))]
    pub fn bucket_stats(&self) -> hash_table::BucketStats {
        self.entries.bucket_stats()
    }

    /// Computes the histogram of collision-chain lengths of the backing set.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> hash_table::ChainHistogram {
        self.entries.chain_histogram()
    }

    pub(crate) fn remove_first_where(&mut self, mut f: impl FnMut(&K, &V) -> bool) -> bool {
        self.entries
            .remove_first(|e| f(e.key(), e.value()))
            .is_some()
    }
}

impl<K, V, C> HashMap<K, V, C>
where
    C: EqualityComparator<K>,
{
    /// Creates an empty map with 16 buckets, load factor 0.75 and the given
    /// key strategy.
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_capacity_load_factor_and_comparator(
            DEFAULT_INITIAL_CAPACITY,
            DEFAULT_LOAD_FACTOR,
            comparator,
        )
    }

    /// Creates an empty map with the given sizing and key strategy.
    pub fn with_capacity_load_factor_and_comparator(
        capacity: usize,
        load_factor: f32,
        comparator: C,
    ) -> Self {
        Self {
            entries: HashSet::with_capacity_load_factor_and_comparator(
                capacity,
                load_factor,
                KeyEqualityComparator::new(comparator),
            ),
        }
    }

    /// Copy-constructs a map from another one with default sizing and a clone
    /// of its key strategy.
    pub fn from_map<C2>(other: &HashMap<K, V, C2>) -> Self
    where
        K: Clone,
        V: Clone,
        C2: EqualityComparator<K> + Clone + Into<C>,
    {
        let mut map = Self::with_comparator(other.comparator().clone().into());
        map.put_all(other);
        map
    }

    #[inline]
    fn key_hash(&self, key: &K) -> i32 {
        self.comparator().hash_code(key)
    }

    /// Associates `value` with `key`.
    ///
    /// If the key is present, its existing entry keeps its key and gets the
    /// new value, and the previous value is returned. Otherwise a new entry is
    /// inserted, growing the backing set first if needed.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.key_hash(&key);
        match self.entries.entry_by(hash, |c, e| c.matches(e, &key)) {
            hash_table::Entry::Occupied(mut entry) => Some(entry.get_mut().set_value(value)),
            hash_table::Entry::Vacant(entry) => {
                entry.insert(Entry::new(key, value));
                None
            }
        }
    }

    /// Returns the entry for `key`, if present.
    pub fn get_entry(&self, key: &K) -> Option<&Entry<K, V>> {
        self.entries
            .find_by(self.key_hash(key), |c, e| c.matches(e, key))
    }

    /// Returns the value for `key`, if present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.put("present", None);
    /// map.put("set", Some(1));
    ///
    /// assert_eq!(map.get(&"present"), Some(&None));
    /// assert_eq!(map.get(&"set"), Some(&Some(1)));
    /// assert_eq!(map.get(&"absent"), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_entry(key).map(Entry::value)
    }

    /// Returns the stored key and value for `key`, if present.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.get_entry(key).map(|e| (e.key(), e.value()))
    }

    /// Returns the value for `key` mutably. The entry's cached hash code is
    /// dropped.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.key_hash(key);
        self.entries
            .find_by_mut(hash, |c, e| c.matches(e, key))
            .map(Entry::value_mut)
    }

    /// Returns `true` if the map has an entry for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_entry(key).is_some()
    }

    /// Removes the entry for `key` and returns its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes the entry for `key` and returns its key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.key_hash(key);
        self.entries
            .remove_by(hash, |c, e| c.matches(e, key))
            .map(Entry::into_parts)
    }

    /// Copies every entry of `other` into this map, replacing the values of
    /// keys already present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashMap;
    ///
    /// let mut a: HashMap<&str, i32> = [("x", 1), ("y", 2)].into_iter().collect();
    /// let b: HashMap<&str, i32> = [("y", 20), ("z", 30)].into_iter().collect();
    /// a.put_all(&b);
    /// assert_eq!(a.len(), 3);
    /// assert_eq!(a.get(&"y"), Some(&20));
    /// ```
    pub fn put_all<C2>(&mut self, other: &HashMap<K, V, C2>)
    where
        K: Clone,
        V: Clone,
    {
        for (k, v) in other.iter() {
            self.put(k.clone(), v.clone());
        }

        crate::trace_event!(merged = other.len(), len = self.len(), "put_all");
    }

    /// Returns `true` if any entry's value equals `value` under the default
    /// policy. This is a linear scan.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: ObjectEq,
    {
        let by_value = ValueEqualityComparator::new(DefaultEqualityComparator::instance());
        self.entries.iter().any(|e| by_value.matches(e, value))
    }

    /// Wrapping sum of the entry hash codes.
    pub fn hash_code(&self) -> i32
    where
        K: ObjectEq,
        V: ObjectEq,
    {
        self.entries
            .iter()
            .fold(0i32, |sum, e| sum.wrapping_add(e.hash_code()))
    }
}

impl<K, V, C> ObjectEq for HashMap<K, V, C>
where
    K: ObjectEq,
    V: ObjectEq,
    C: EqualityComparator<K>,
{
    fn hash_code(&self) -> i32 {
        HashMap::hash_code(self)
    }

    fn custom_equals(&self, other: &Self) -> Option<bool> {
        Some(self == other)
    }
}

impl<K: ObjectEq, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// An iterator over the entries of a [`HashMap`] as `(&K, &V)`.
pub struct Iter<'a, K, V> {
    inner: hash_set::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (e.key(), e.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

/// An iterator over the entries of a [`HashMap`] as `(&K, &mut V)`.
pub struct IterMut<'a, K, V> {
    inner: hash_table::IterMut<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Entry::parts_mut)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// A consuming iterator over the entries of a [`HashMap`] as `(K, V)`.
pub struct IntoIter<K, V> {
    inner: hash_set::IntoIter<Entry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Entry::into_parts)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, C> IntoIterator for HashMap<K, V, C> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.entries.into_iter(),
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a HashMap<K, V, C> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut HashMap<K, V, C> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K: ObjectEq, V> FromIterator<(K, V)> for HashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C> Extend<(K, V)> for HashMap<K, V, C>
where
    C: EqualityComparator<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}
