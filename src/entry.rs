use core::cell::Cell;
use core::fmt::Debug;
use core::fmt::Display;

use crate::comparator::DefaultComparator;
use crate::comparator::DefaultEqualityComparator;
use crate::comparator::EqualityComparator;
use crate::object::ObjectEq;

/// A key/value pair stored in a [`HashMap`](crate::HashMap).
///
/// The key is fixed at construction. The value can be replaced with
/// [`set_value`](Entry::set_value), which also drops the cached hash code.
///
/// Entry equality is deliberately coarse: two entries are equal when their
/// keys are both null or have equal hash codes, and the same holds for their
/// values. Keys and values are never compared beyond their hash codes.
///
/// # Examples
///
/// ```rust
/// use eqhash::Entry;
/// use eqhash::ObjectEq;
///
/// let a = Entry::new("x", Some(1));
/// let b = Entry::new("x", Some(1));
/// assert_eq!(a, b);
/// assert_eq!(a.hash_code(), b.hash_code());
///
/// assert_eq!(Entry::new(None::<&str>, None::<i32>), Entry::new(None, None));
/// ```
pub struct Entry<K, V> {
    key: K,
    value: V,
    hash: Cell<Option<i32>>,
}

impl<K, V> Entry<K, V> {
    /// Creates an entry with no cached hash code.
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            hash: Cell::new(None),
        }
    }

    /// Returns the key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns the value mutably. The cached hash code is dropped.
    pub fn value_mut(&mut self) -> &mut V {
        self.hash.set(None);
        &mut self.value
    }

    /// Replaces the value and returns the previous one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::Entry;
    ///
    /// let mut entry = Entry::new("k", 1);
    /// assert_eq!(entry.set_value(2), 1);
    /// assert_eq!(*entry.value(), 2);
    /// ```
    pub fn set_value(&mut self, value: V) -> V {
        self.hash.set(None);
        core::mem::replace(&mut self.value, value)
    }

    /// Splits the entry into its key and value.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }

    pub(crate) fn parts_mut(&mut self) -> (&K, &mut V) {
        self.hash.set(None);
        (&self.key, &mut self.value)
    }

    #[cfg(test)]
    fn is_hash_cached(&self) -> bool {
        self.hash.get().is_some()
    }
}

fn same_hash_state<T: ObjectEq + ?Sized>(a: &T, b: &T) -> bool {
    let comparator = DefaultEqualityComparator::instance();
    match (a.is_null(), b.is_null()) {
        (true, true) => true,
        (false, false) => comparator.hash_code(a) == comparator.hash_code(b),
        _ => false,
    }
}

impl<K: ObjectEq, V: ObjectEq> ObjectEq for Entry<K, V> {
    fn hash_code(&self) -> i32 {
        if let Some(hash) = self.hash.get() {
            return hash;
        }

        let comparator = DefaultEqualityComparator::instance();
        let hash = comparator.hash_code(&self.key) ^ comparator.hash_code(&self.value);
        self.hash.set(Some(hash));
        hash
    }

    fn custom_equals(&self, other: &Self) -> Option<bool> {
        Some(same_hash_state(&self.key, &other.key) && same_hash_state(&self.value, &other.value))
    }
}

impl<K: ObjectEq, V: ObjectEq> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.custom_equals(other).unwrap_or(false)
    }
}

impl<K: ObjectEq, V: ObjectEq> Eq for Entry<K, V> {}

impl<K: Clone, V: Clone> Clone for Entry<K, V> {
    fn clone(&self) -> Self {
        Self::new(self.key.clone(), self.value.clone())
    }
}

impl<K: Debug, V: Debug> Debug for Entry<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

impl<K: Display, V: Display> Display for Entry<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Compares entries by key alone, using the key strategy `C`.
///
/// This is the strategy of a map's backing set: it makes the set hold at most
/// one entry per distinct key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyEqualityComparator<C = DefaultComparator>(C);

impl<C> KeyEqualityComparator<C> {
    /// Wraps a key strategy.
    pub fn new(keys: C) -> Self {
        Self(keys)
    }

    /// Returns the key strategy.
    pub fn inner(&self) -> &C {
        &self.0
    }

    /// Whether `entry`'s key equals `key` under the key strategy.
    pub fn matches<K, V>(&self, entry: &Entry<K, V>, key: &K) -> bool
    where
        C: EqualityComparator<K>,
    {
        self.0.equals(&entry.key, key)
    }
}

impl<K, V, C> EqualityComparator<Entry<K, V>> for KeyEqualityComparator<C>
where
    C: EqualityComparator<K>,
{
    fn hash_code(&self, entry: &Entry<K, V>) -> i32 {
        self.0.hash_code(&entry.key)
    }

    fn equals(&self, a: &Entry<K, V>, b: &Entry<K, V>) -> bool {
        self.0.equals(&a.key, &b.key)
    }
}

/// Compares entries by value alone, using the value strategy `C`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueEqualityComparator<C = DefaultComparator>(C);

impl<C> ValueEqualityComparator<C> {
    /// Wraps a value strategy.
    pub fn new(values: C) -> Self {
        Self(values)
    }

    /// Returns the value strategy.
    pub fn inner(&self) -> &C {
        &self.0
    }

    /// Whether `entry`'s value equals `value` under the value strategy.
    pub fn matches<K, V>(&self, entry: &Entry<K, V>, value: &V) -> bool
    where
        C: EqualityComparator<V>,
    {
        self.0.equals(&entry.value, value)
    }
}

impl<K, V, C> EqualityComparator<Entry<K, V>> for ValueEqualityComparator<C>
where
    C: EqualityComparator<V>,
{
    fn hash_code(&self, entry: &Entry<K, V>) -> i32 {
        self.0.hash_code(&entry.value)
    }

    fn equals(&self, a: &Entry<K, V>, b: &Entry<K, V>) -> bool {
        self.0.equals(&a.value, &b.value)
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn equal_entries() {
        assert_eq!(Entry::new("x", Some(1)), Entry::new("x", Some(1)));
        assert_eq!(Entry::new("x", None::<i32>), Entry::new("x", None));
        assert_eq!(Entry::new(None::<&str>, None::<i32>), Entry::new(None, None));

        assert_ne!(Entry::new("x", Some(1)), Entry::new("x", Some(2)));
        assert_ne!(Entry::new("x", Some(1)), Entry::new("y", Some(1)));
        assert_ne!(Entry::new(Some("x"), None::<i32>), Entry::new(None, None));
        assert_ne!(Entry::new("x", Some(0)), Entry::new("x", None));
    }

    #[test]
    fn equality_is_hash_level() {
        struct Collides(&'static str);

        impl ObjectEq for Collides {
            fn hash_code(&self) -> i32 {
                1
            }

            fn custom_equals(&self, other: &Self) -> Option<bool> {
                Some(self.0 == other.0)
            }
        }

        let a = Entry::new(1, Collides("a"));
        let b = Entry::new(1, Collides("b"));
        assert!(a == b);
    }

    #[test]
    fn hash_code_is_cached_and_invalidated() {
        let mut entry = Entry::new("k", 1);
        assert!(!entry.is_hash_cached());

        let first = entry.hash_code();
        assert_eq!(first, "k".hash_code() ^ 1i32.hash_code());
        assert!(entry.is_hash_cached());
        assert_eq!(entry.hash_code(), first);

        assert_eq!(entry.set_value(2), 1);
        assert!(!entry.is_hash_cached());
        assert_eq!(entry.hash_code(), "k".hash_code() ^ 2i32.hash_code());

        *entry.value_mut() = 1;
        assert_eq!(entry.hash_code(), first);
    }

    #[test]
    fn null_sides_hash_to_zero() {
        let entry = Entry::new(None::<i32>, None::<i32>);
        assert_eq!(entry.hash_code(), 0);

        let entry = Entry::new(Some(5), None::<i32>);
        assert_eq!(entry.hash_code(), 5i32.hash_code());
    }

    #[test]
    fn clone_starts_with_fresh_cache() {
        let entry = Entry::new("k", 3);
        entry.hash_code();
        let copy = entry.clone();
        assert!(!copy.is_hash_cached());
        assert_eq!(copy, entry);
    }

    #[test]
    fn key_and_value_strategies() {
        let keys = KeyEqualityComparator::new(DefaultEqualityComparator::instance());
        let values = ValueEqualityComparator::new(DefaultEqualityComparator::instance());
        let a = Entry::new("a", 1);
        let b = Entry::new("a", 2);
        let c = Entry::new("c", 1);

        assert!(keys.equals(&a, &b));
        assert!(!keys.equals(&a, &c));
        assert_eq!(keys.hash_code(&a), "a".hash_code());
        assert!(keys.matches(&a, &"a"));

        assert!(values.equals(&a, &c));
        assert!(!values.equals(&a, &b));
        assert_eq!(values.hash_code(&b), 2i32.hash_code());
        assert!(values.matches(&c, &1));
    }

    #[test]
    fn display_and_debug() {
        let entry = Entry::new("k", 4);
        assert_eq!(format!("{entry}"), "k=4");
        assert_eq!(format!("{entry:?}"), "Entry { key: \"k\", value: 4 }");
    }

    #[test]
    fn into_parts() {
        let (k, v) = Entry::new("k", 9).into_parts();
        assert_eq!((k, v), ("k", 9));
    }
}
