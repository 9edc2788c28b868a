use core::fmt::Debug;
use core::ops::Deref;
use core::ops::DerefMut;

use crate::collection::Collection;
use crate::comparator::DefaultEqualityComparator;
use crate::comparator::EqualityComparator;
use crate::hash_map;
use crate::hash_map::HashMap;
use crate::object::ObjectEq;

/// A live view of a map's keys.
///
/// The view owns nothing: it borrows the map, shared (`KeySet<&HashMap>`) or
/// exclusively (`KeySet<&mut HashMap>`). Only an exclusive view can remove,
/// and removing a key removes its whole entry from the map.
///
/// # Examples
///
/// ```rust
/// use eqhash::HashMap;
/// use eqhash::HashSet;
///
/// let map: HashMap<i32, &str> = [(1, "a"), (2, "b")].into_iter().collect();
/// let mut set: HashSet<i32> = (0..5).collect();
///
/// set.retain_all(&map.key_set());
/// assert_eq!(set.len(), 2);
/// ```
pub struct KeySet<M> {
    map: M,
}

/// A live view of a map's values.
///
/// Membership uses the default object-equality policy and scans every entry.
/// Removing a value through an exclusive view removes the whole entry that
/// holds it.
pub struct Values<M> {
    map: M,
}

impl<M> KeySet<M> {
    pub(crate) fn new(map: M) -> Self {
        Self { map }
    }
}

impl<M> Values<M> {
    pub(crate) fn new(map: M) -> Self {
        Self { map }
    }
}

impl<K, V, C, M> KeySet<M>
where
    M: Deref<Target = HashMap<K, V, C>>,
{
    /// Number of keys, which is the map's length.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates the keys in the map's entry order.
    pub fn iter<'a>(&'a self) -> Keys<'a, K, V>
    where
        C: 'a,
    {
        Keys {
            inner: self.map.iter(),
        }
    }

    /// Whether the map has an entry for `key`.
    pub fn contains(&self, key: &K) -> bool
    where
        C: EqualityComparator<K>,
    {
        self.map.contains_key(key)
    }

    /// Whether the map has an entry for every yielded key.
    pub fn contains_all<'a, I>(&self, keys: I) -> bool
    where
        C: EqualityComparator<K>,
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        keys.into_iter().all(|k| self.map.contains_key(k))
    }
}

impl<K, V, C, M> KeySet<M>
where
    M: DerefMut<Target = HashMap<K, V, C>>,
    C: EqualityComparator<K>,
{
    /// Removes the entry for `key`. Returns whether one was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }

    /// Removes every entry whose key `other` contains. Returns whether the map
    /// changed.
    pub fn remove_all<O>(&mut self, other: &O) -> bool
    where
        O: Collection<K> + ?Sized,
    {
        let before = self.map.len();
        self.map.retain(|k, _| !other.contains(k));
        before != self.map.len()
    }

    /// Keeps only the entries whose key `other` contains. Returns whether the
    /// map changed.
    pub fn retain_all<O>(&mut self, other: &O) -> bool
    where
        O: Collection<K> + ?Sized,
    {
        let before = self.map.len();
        self.map.retain(|k, _| other.contains(k));
        before != self.map.len()
    }

    /// Keeps only the entries whose key satisfies `f`.
    pub fn retain(&mut self, mut f: impl FnMut(&K) -> bool) {
        self.map.retain(|k, _| f(k));
    }

    /// Removes every entry from the map.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, V, C, M> Values<M>
where
    M: Deref<Target = HashMap<K, V, C>>,
{
    /// Number of values, which is the map's length.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates the values in the map's entry order.
    pub fn iter<'a>(&'a self) -> ValueIter<'a, K, V>
    where
        C: 'a,
    {
        ValueIter {
            inner: self.map.iter(),
        }
    }

    /// Whether any entry holds a value equal to `value`.
    pub fn contains(&self, value: &V) -> bool
    where
        V: ObjectEq,
        C: EqualityComparator<K>,
    {
        self.map.contains_value(value)
    }

    /// Whether every yielded value is held by some entry.
    pub fn contains_all<'a, I>(&self, values: I) -> bool
    where
        V: ObjectEq + 'a,
        C: EqualityComparator<K>,
        I: IntoIterator<Item = &'a V>,
    {
        values.into_iter().all(|v| self.map.contains_value(v))
    }
}

impl<K, V, C, M> Values<M>
where
    M: DerefMut<Target = HashMap<K, V, C>>,
{
    /// Removes the first entry, in iteration order, whose value equals
    /// `value`. Returns whether one was found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = [("a", 1), ("b", 1)].into_iter().collect();
    /// assert!(map.values_mut().remove(&1));
    /// assert_eq!(map.len(), 1);
    /// assert!(!map.values_mut().remove(&7));
    /// ```
    pub fn remove(&mut self, value: &V) -> bool
    where
        V: ObjectEq,
    {
        let comparator = DefaultEqualityComparator::instance();
        self.map
            .remove_first_where(|_, v| comparator.equals(v, value))
    }

    /// Removes every entry whose value `other` contains. Returns whether the
    /// map changed.
    pub fn remove_all<O>(&mut self, other: &O) -> bool
    where
        O: Collection<V> + ?Sized,
    {
        let before = self.map.len();
        self.map.retain(|_, v| !other.contains(v));
        before != self.map.len()
    }

    /// Keeps only the entries whose value `other` contains. Returns whether
    /// the map changed.
    pub fn retain_all<O>(&mut self, other: &O) -> bool
    where
        O: Collection<V> + ?Sized,
    {
        let before = self.map.len();
        self.map.retain(|_, v| other.contains(v));
        before != self.map.len()
    }

    /// Keeps only the entries whose value satisfies `f`.
    pub fn retain(&mut self, mut f: impl FnMut(&V) -> bool) {
        self.map.retain(|_, v| f(v));
    }

    /// Removes every entry from the map.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, V, C, M> Collection<K> for KeySet<M>
where
    M: Deref<Target = HashMap<K, V, C>>,
    C: EqualityComparator<K>,
{
    fn len(&self) -> usize {
        self.map.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }
}

impl<K, V, C, M> Collection<V> for Values<M>
where
    M: Deref<Target = HashMap<K, V, C>>,
    V: ObjectEq,
    C: EqualityComparator<K>,
{
    fn len(&self) -> usize {
        self.map.len()
    }

    fn contains(&self, value: &V) -> bool {
        self.map.contains_value(value)
    }
}

impl<K, V, C, M> Debug for KeySet<M>
where
    M: Deref<Target = HashMap<K, V, C>>,
    K: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, V, C, M> Debug for Values<M>
where
    M: Deref<Target = HashMap<K, V, C>>,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, K, V, C> IntoIterator for KeySet<&'a HashMap<K, V, C>> {
    type IntoIter = Keys<'a, K, V>;
    type Item = &'a K;

    fn into_iter(self) -> Self::IntoIter {
        Keys {
            inner: self.map.iter(),
        }
    }
}

impl<'a, K, V, C> IntoIterator for Values<&'a HashMap<K, V, C>> {
    type IntoIter = ValueIter<'a, K, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        ValueIter {
            inner: self.map.iter(),
        }
    }
}

/// An iterator over the keys of a [`HashMap`].
pub struct Keys<'a, K, V> {
    inner: hash_map::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`HashMap`].
pub struct ValueIter<'a, K, V> {
    inner: hash_map::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for ValueIter<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValueIter<'_, K, V> {}
