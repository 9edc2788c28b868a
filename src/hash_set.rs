use core::fmt::Debug;
use core::fmt::Display;

use crate::collection::Collection;
use crate::comparator::DefaultComparator;
use crate::comparator::DefaultEqualityComparator;
use crate::comparator::EqualityComparator;
use crate::error::CapacityError;
use crate::hash_table;
use crate::hash_table::DEFAULT_INITIAL_CAPACITY;
use crate::hash_table::DEFAULT_LOAD_FACTOR;
use crate::hash_table::HashTable;
use crate::object::ObjectEq;

/// A hash set whose notion of "same element" is supplied by an
/// [`EqualityComparator`].
///
/// `HashSet<T, C>` stores values of type `T` in the chained [`HashTable`]
/// and asks the strategy `C` for every hash code and every equality decision.
/// With the default strategy, elements follow hash-code/equals object
/// equality through [`ObjectEq`]; `T` needs neither `Hash` nor `Eq`.
///
/// Iteration visits buckets in index order and each bucket front to back.
///
/// # Examples
///
/// ```rust
/// use eqhash::HashSet;
///
/// let mut set = HashSet::new();
/// assert!(set.add("a".to_string()));
/// assert!(!set.add("a".to_string()));
/// assert!(set.contains(&"a".to_string()));
/// assert_eq!(set.len(), 1);
/// ```
pub struct HashSet<T, C = DefaultComparator> {
    table: HashTable<T>,
    comparator: C,
}

impl<T, C> PartialEq for HashSet<T, C>
where
    C: EqualityComparator<T>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.contains_all(other.iter()) && other.contains_all(self.iter())
    }
}

impl<T, C> Eq for HashSet<T, C> where C: EqualityComparator<T> {}

impl<T, C> Debug for HashSet<T, C>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> Display for HashSet<T, C>
where
    T: Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("{")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            Display::fmt(value, f)?;
        }
        f.write_str("}")
    }
}

impl<T, C> Clone for HashSet<T, C>
where
    T: Clone,
    C: EqualityComparator<T> + Clone,
{
    /// Copy-constructs the set: a fresh table sized for the current count,
    /// holding clones of every element, with a clone of the strategy.
    fn clone(&self) -> Self {
        Self::from_collection_with_comparator(
            self.iter().cloned(),
            self.load_factor(),
            self.comparator.clone(),
        )
    }
}

impl<T: ObjectEq> HashSet<T> {
    /// Creates an empty set with 16 buckets, load factor 0.75 and the default
    /// strategy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), 16);
    /// ```
    pub fn new() -> Self {
        Self::with_comparator(DefaultEqualityComparator::instance())
    }

    /// Creates an empty set with at least `capacity` buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::with_capacity(100);
    /// assert_eq!(set.capacity(), 128);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_load_factor(capacity, DEFAULT_LOAD_FACTOR)
    }

    /// Creates an empty set with at least `capacity` buckets and the given
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
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::CapacityError;
    /// use eqhash::HashSet;
    ///
    /// assert!(HashSet::<i32>::try_with_capacity_and_load_factor(8, 0.5).is_ok());
    /// assert_eq!(
    ///     HashSet::<i32>::try_with_capacity_and_load_factor(8, 0.0).unwrap_err(),
    ///     CapacityError::InvalidLoadFactor(0.0)
    /// );
    /// ```
    pub fn try_with_capacity_and_load_factor(
        capacity: usize,
        load_factor: f32,
    ) -> Result<Self, CapacityError> {
        Self::try_with_capacity_load_factor_and_comparator(
            capacity,
            load_factor,
            DefaultEqualityComparator::instance(),
        )
    }

    /// Copy-constructs a set from any source that can report its count and be
    /// iterated. The capacity is the source's count rounded up to a power of
    /// two.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashSet;
    ///
    /// let set = HashSet::from_collection(vec![1, 2, 2, 3]);
    /// assert_eq!(set.len(), 3);
    /// assert_eq!(set.capacity(), 4);
    /// ```
    pub fn from_collection<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        Self::from_collection_with_comparator(
            source,
            DEFAULT_LOAD_FACTOR,
            DefaultEqualityComparator::instance(),
        )
    }
}

impl<T, C> HashSet<T, C> {
    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the element count at which the next insertion doubles the
    /// capacity.
    pub fn threshold(&self) -> usize {
        self.table.threshold()
    }

    /// Returns the load factor fixed at construction.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Returns the strategy this set compares elements with.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Removes all elements. The capacity is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashSet;
    ///
    /// let mut set: HashSet<i32> = (0..40).collect();
    /// let capacity = set.capacity();
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Keeps only the elements for which `f` returns `true`.
    ///
    /// Kept elements keep their relative order inside each bucket.
    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        self.table.retain(f);
    }

    /// Returns an iterator over the elements in bucket order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    pub(crate) fn iter_mut(&mut self) -> hash_table::IterMut<'_, T> {
        self.table.iter_mut()
    }

    pub(crate) fn remove_first(&mut self, f: impl FnMut(&T) -> bool) -> Option<T> {
        self.table.remove_first(f)
    }

    /// Returns the bucket statistics of the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn bucket_stats(&self) -> hash_table::BucketStats {
        self.table.bucket_stats()
    }

    /// Computes the histogram of collision-chain lengths.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> hash_table::ChainHistogram {
        self.table.chain_histogram()
    }
}

impl<T, C> HashSet<T, C>
where
    C: EqualityComparator<T>,
{
    /// Creates an empty set with 16 buckets, load factor 0.75 and the given
    /// strategy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::EqualityComparator;
    /// use eqhash::HashSet;
    /// use eqhash::value_hash;
    ///
    /// struct CaseInsensitive;
    ///
    /// impl EqualityComparator<String> for CaseInsensitive {
    ///     fn hash_code(&self, value: &String) -> i32 {
    ///         value_hash(&value.to_lowercase())
    ///     }
    ///
    ///     fn equals(&self, a: &String, b: &String) -> bool {
    ///         a.eq_ignore_ascii_case(b)
    ///     }
    /// }
    ///
    /// let mut set = HashSet::with_comparator(CaseInsensitive);
    /// assert!(set.add("Hello".to_string()));
    /// assert!(!set.add("HELLO".to_string()));
    /// assert_eq!(set.get(&"hello".to_string()).map(String::as_str), Some("Hello"));
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_capacity_load_factor_and_comparator(
            DEFAULT_INITIAL_CAPACITY,
            DEFAULT_LOAD_FACTOR,
            comparator,
        )
    }

    /// Creates an empty set with the given sizing and strategy. An invalid
    /// load factor falls back to 0.75.
    pub fn with_capacity_load_factor_and_comparator(
        capacity: usize,
        load_factor: f32,
        comparator: C,
    ) -> Self {
        Self {
            table: HashTable::with_capacity_and_load_factor(capacity, load_factor),
            comparator,
        }
    }

    /// Fallible form of
    /// [`with_capacity_load_factor_and_comparator`](Self::with_capacity_load_factor_and_comparator).
    pub fn try_with_capacity_load_factor_and_comparator(
        capacity: usize,
        load_factor: f32,
        comparator: C,
    ) -> Result<Self, CapacityError> {
        Ok(Self {
            table: HashTable::try_with_capacity_and_load_factor(capacity, load_factor)?,
            comparator,
        })
    }

    /// Copy-constructs a set with an explicit load factor and strategy. The
    /// capacity is the source's count rounded up to a power of two.
    pub fn from_collection_with_comparator<I>(source: I, load_factor: f32, comparator: C) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let source = source.into_iter();
        let count = source.len();
        let mut set = Self::with_capacity_load_factor_and_comparator(count, load_factor, comparator);
        for value in source {
            set.add(value);
        }

        crate::trace_event!(
            source_len = count,
            len = set.len(),
            capacity = set.capacity(),
            "copy-constructed set"
        );
        set
    }

    /// Returns the element equal to `value`, inserting `value` first if there
    /// is none.
    ///
    /// An existing element is returned unchanged and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// let first: *const String = set.get_or_add("x".to_string());
    /// let again: *const String = set.get_or_add("x".to_string());
    /// assert_eq!(first, again);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn get_or_add(&mut self, value: T) -> &T {
        let hash = self.comparator.hash_code(&value);
        let Self { table, comparator } = self;
        match table.entry(
            hash,
            |e| comparator.equals(e, &value),
            |e| comparator.hash_code(e),
        ) {
            hash_table::Entry::Occupied(entry) => entry.into_mut(),
            hash_table::Entry::Vacant(entry) => entry.insert(value),
        }
    }

    /// Adds `value` to the set.
    ///
    /// Returns `true` if it was inserted, `false` if an equal element was
    /// already present (the set is then unchanged).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert!(set.add(1));
    /// assert!(!set.add(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn add(&mut self, value: T) -> bool {
        let hash = self.comparator.hash_code(&value);
        let Self { table, comparator } = self;
        match table.entry(
            hash,
            |e| comparator.equals(e, &value),
            |e| comparator.hash_code(e),
        ) {
            hash_table::Entry::Occupied(_) => false,
            hash_table::Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Returns the stored element equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.comparator.hash_code(value);
        self.table.find(hash, |e| self.comparator.equals(e, value))
    }

    /// Returns `true` if the set holds an element equal to `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashSet;
    ///
    /// let set: HashSet<Option<i32>> = [Some(1), None].into_iter().collect();
    /// assert!(set.contains(&None));
    /// assert!(set.contains(&Some(1)));
    /// assert!(!set.contains(&Some(2)));
    /// ```
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Removes the element equal to `value`. Returns whether one was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the element equal to `value`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.add("a".to_string());
    /// assert_eq!(set.take(&"a".to_string()), Some("a".to_string()));
    /// assert_eq!(set.take(&"a".to_string()), None);
    /// ```
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.comparator.hash_code(value);
        let Self { table, comparator } = self;
        table.remove(hash, |e| comparator.equals(e, value))
    }

    /// Returns `true` if every yielded value is in the set.
    pub fn contains_all<'a, I>(&self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        values.into_iter().all(|v| self.contains(v))
    }

    /// Adds every yielded value. Returns `true` if any was inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert!(set.add_all([1, 2, 3]));
    /// assert!(!set.add_all([1, 2]));
    /// assert_eq!(set.len(), 3);
    /// ```
    pub fn add_all(&mut self, values: impl IntoIterator<Item = T>) -> bool {
        let mut changed = false;
        for value in values {
            changed |= self.add(value);
        }

        crate::trace_event!(changed, len = self.len(), "add_all");
        changed
    }

    /// Removes every yielded value. Returns `true` if any was removed.
    pub fn remove_all<'a, I>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut changed = false;
        for value in values {
            changed |= self.remove(value);
        }
        changed
    }

    /// Keeps only the elements `other` contains. Returns whether the set
    /// changed.
    ///
    /// Each bucket is compacted in place, so the survivors keep their relative
    /// order inside their bucket.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eqhash::HashSet;
    ///
    /// let mut set: HashSet<i32> = (1..=5).collect();
    /// assert!(set.retain_all(&vec![2, 4, 6]));
    /// assert_eq!(set.len(), 2);
    /// assert!(!set.retain_all(&vec![2, 4]));
    /// ```
    pub fn retain_all<O>(&mut self, other: &O) -> bool
    where
        O: Collection<T> + ?Sized,
    {
        let before = self.len();
        self.table.retain(|e| other.contains(e));

        crate::trace_event!(removed = before - self.len(), len = self.len(), "retain_all");
        before != self.len()
    }

    /// Wrapping sum of the element hash codes under this set's strategy.
    ///
    /// Independent of iteration order, so equal sets hash equally.
    pub fn hash_code(&self) -> i32 {
        self.iter()
            .fold(0i32, |sum, e| sum.wrapping_add(self.comparator.hash_code(e)))
    }

    /// Doubles the capacity, rehashing every element.
    pub fn expand(&mut self) {
        let comparator = &self.comparator;
        self.table.expand(|e| comparator.hash_code(e));
    }

    pub(crate) fn find_by(&self, hash: i32, eq: impl Fn(&C, &T) -> bool) -> Option<&T> {
        let comparator = &self.comparator;
        self.table.find(hash, |e| eq(&*comparator, e))
    }

    pub(crate) fn find_by_mut(
        &mut self,
        hash: i32,
        eq: impl Fn(&C, &T) -> bool,
    ) -> Option<&mut T> {
        let Self { table, comparator } = self;
        table.find_mut(hash, |e| eq(&*comparator, e))
    }

    pub(crate) fn remove_by(&mut self, hash: i32, eq: impl Fn(&C, &T) -> bool) -> Option<T> {
        let Self { table, comparator } = self;
        table.remove(hash, |e| eq(&*comparator, e))
    }

    pub(crate) fn entry_by(
        &mut self,
        hash: i32,
        eq: impl Fn(&C, &T) -> bool,
    ) -> hash_table::Entry<'_, T> {
        let Self { table, comparator } = self;
        table.entry(hash, |e| eq(&*comparator, e), |e| comparator.hash_code(e))
    }
}

impl<T, C> ObjectEq for HashSet<T, C>
where
    C: EqualityComparator<T>,
{
    fn hash_code(&self) -> i32 {
        HashSet::hash_code(self)
    }

    fn custom_equals(&self, other: &Self) -> Option<bool> {
        Some(self == other)
    }
}

impl<T, C> Collection<T> for HashSet<T, C>
where
    C: EqualityComparator<T>,
{
    fn len(&self) -> usize {
        HashSet::len(self)
    }

    fn contains(&self, value: &T) -> bool {
        HashSet::contains(self, value)
    }
}

impl<T: ObjectEq> Default for HashSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An iterator over the elements of a [`HashSet`].
pub struct Iter<'a, T> {
    inner: hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

/// A consuming iterator over the elements of a [`HashSet`].
pub struct IntoIter<T> {
    inner: hash_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T, C> IntoIterator for HashSet<T, C> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a HashSet<T, C> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: ObjectEq> FromIterator<T> for HashSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T, C> Extend<T> for HashSet<T, C>
where
    C: EqualityComparator<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::Hash;
    use core::hash::Hasher;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;

    use super::*;

    /// Keyed SipHash strategy over structural equality.
    #[derive(Clone)]
    struct SipComparator {
        k1: u64,
        k2: u64,
    }

    impl Default for SipComparator {
        fn default() -> Self {
            Self {
                k1: OsRng.try_next_u64().unwrap_or(0),
                k2: OsRng.try_next_u64().unwrap_or(0),
            }
        }
    }

    impl<T: Hash + PartialEq> EqualityComparator<T> for SipComparator {
        fn hash_code(&self, value: &T) -> i32 {
            let mut hasher = SipHasher::new_with_keys(self.k1, self.k2);
            value.hash(&mut hasher);
            hasher.finish() as i32
        }

        fn equals(&self, a: &T, b: &T) -> bool {
            a == b
        }
    }

    /// Sends every element to bucket 0.
    #[derive(Clone, Copy)]
    struct OneBucket;

    impl EqualityComparator<i32> for OneBucket {
        fn hash_code(&self, _value: &i32) -> i32 {
            0
        }

        fn equals(&self, a: &i32, b: &i32) -> bool {
            a == b
        }
    }

    #[test]
    fn test_new_and_with_comparator() {
        let set: HashSet<i32> = HashSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.capacity(), 16);
        assert_eq!(set.threshold(), 12);
        assert_eq!(set.load_factor(), 0.75);

        let set2 = HashSet::<i32, _>::with_comparator(SipComparator::default());
        assert!(set2.is_empty());
        assert_eq!(set2.capacity(), 16);
    }

    #[test]
    fn test_with_capacity() {
        let set: HashSet<i32> = HashSet::with_capacity(100);
        assert_eq!(set.capacity(), 128);
        assert!(set.is_empty());

        let set2: HashSet<i32> = HashSet::with_capacity_and_load_factor(8, 0.5);
        assert_eq!(set2.capacity(), 8);
        assert_eq!(set2.threshold(), 4);

        let fallback: HashSet<i32> = HashSet::with_capacity_and_load_factor(8, 2.0);
        assert_eq!(fallback.load_factor(), 0.75);
        assert_eq!(fallback.threshold(), 6);
    }

    #[test]
    fn test_add_and_contains() {
        let mut set = HashSet::with_comparator(SipComparator::default());

        assert!(set.add(1));
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
        assert!(set.contains(&1));

        assert!(!set.add(1));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&1));

        assert!(set.add(2));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(set.contains(&2));
        assert!(!set.contains(&3));
    }

    #[test]
    fn test_get_or_add_keeps_existing() {
        #[derive(Debug)]
        struct Tagged {
            id: i32,
            tag: &'static str,
        }

        impl ObjectEq for Tagged {
            fn hash_code(&self) -> i32 {
                self.id
            }

            fn custom_equals(&self, other: &Self) -> Option<bool> {
                Some(self.id == other.id)
            }
        }

        let mut set = HashSet::new();
        assert_eq!(set.get_or_add(Tagged { id: 1, tag: "first" }).tag, "first");
        assert_eq!(set.get_or_add(Tagged { id: 1, tag: "second" }).tag, "first");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = HashSet::with_comparator(SipComparator::default());
        set.add(1);
        set.add(2);
        set.add(3);

        assert!(set.remove(&2));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(!set.contains(&2));
        assert!(set.contains(&3));

        assert!(!set.remove(&2));
        assert!(!set.remove(&4));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_take_and_get() {
        let mut set = HashSet::new();
        set.add(42);
        set.add(7);

        assert_eq!(set.get(&42), Some(&42));
        assert_eq!(set.get(&1), None);

        assert_eq!(set.take(&42), Some(42));
        assert_eq!(set.len(), 1);
        assert_eq!(set.take(&42), None);
        assert_eq!(set.take(&3), None);
    }

    #[test]
    fn test_null_element() {
        let mut set: HashSet<Option<String>> = HashSet::new();
        assert!(set.add(None));
        assert!(!set.add(None));
        assert!(set.add(Some("x".to_string())));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&None));
        assert!(set.remove(&None));
        assert!(!set.contains(&None));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_growth_from_sixteen() {
        let mut set = HashSet::new();
        for i in 0..12 {
            set.add(i);
        }
        assert_eq!(set.capacity(), 16);

        set.add(12);
        assert_eq!(set.capacity(), 32);
        assert_eq!(set.threshold(), 24);
        for i in 0..13 {
            assert!(set.contains(&i), "lost {i} after expansion: {:?}", set);
        }
    }

    #[test]
    fn test_large_growth() {
        let mut set = HashSet::with_comparator(SipComparator::default());
        for i in 0..10_000 {
            assert!(set.add(i));
            assert!(set.capacity().is_power_of_two());
        }
        assert_eq!(set.len(), 10_000);
        assert_eq!(
            set.threshold(),
            (set.capacity() as f64 * 0.75) as usize
        );
        for i in 0..10_000 {
            assert!(set.contains(&i));
        }
        for i in (0..10_000).step_by(2) {
            assert!(set.remove(&i));
        }
        assert_eq!(set.len(), 5_000);
        assert_eq!(set.iter().count(), 5_000);
    }

    #[test]
    fn test_explicit_expand() {
        let mut set: HashSet<i32> = (0..5).collect();
        set.expand();
        assert_eq!(set.capacity(), 32);
        assert_eq!(set.threshold(), 24);
        assert_eq!(set.len(), 5);
        assert!(set.contains_all(&[0, 1, 2, 3, 4]));
    }

    #[test]
    fn test_clear() {
        let mut set: HashSet<i32> = [1, 2, 3].into_iter().collect();

        assert_eq!(set.len(), 3);
        set.clear();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
        assert!(!set.contains(&1));
        assert_eq!(set.capacity(), 16);
    }

    #[test]
    fn test_bulk_operations() {
        let mut set = HashSet::new();
        assert!(set.add_all(vec![1, 2, 3]));
        assert!(!set.add_all(vec![1, 3]));
        assert!(set.add_all(vec![3, 4]));
        assert_eq!(set.len(), 4);

        assert!(set.contains_all(&[1, 4]));
        assert!(!set.contains_all(&[1, 5]));
        assert!(set.contains_all(&[]));

        assert!(set.remove_all(&[1, 9]));
        assert!(!set.remove_all(&[9]));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_retain_all_keeps_intersection() {
        let mut set: HashSet<i32> = (0..20).collect();
        let other: HashSet<i32> = (10..30).collect();

        assert!(set.retain_all(&other));
        assert_eq!(set.len(), 10);
        for i in 10..20 {
            assert!(set.contains(&i));
        }
        assert!(!set.retain_all(&other));
    }

    #[test]
    fn test_retain_all_preserves_bucket_order() {
        let mut set = HashSet::with_comparator(OneBucket);
        for i in 0..10 {
            set.add(i);
        }
        assert_eq!(set.bucket_stats().longest_chain, 10);

        assert!(set.retain_all(&vec![8, 1, 5, 3]));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5, 8]);
    }

    #[test]
    fn test_retain() {
        let mut set: HashSet<i32> = (1..=6).collect();
        set.retain(|&x| x % 2 == 0);
        assert_eq!(set.len(), 3);
        assert!(set.contains(&2));
        assert!(set.contains(&4));
        assert!(set.contains(&6));
        assert!(!set.contains(&1));
    }

    #[test]
    fn test_equality_and_hash_code() {
        let mut a = HashSet::new();
        let mut b = HashSet::with_capacity(64);
        for i in 0..20 {
            a.add(i);
        }
        for i in (0..20).rev() {
            b.add(i);
        }

        assert_eq!(a, b);
        assert_eq!(a.hash_code(), b.hash_code());

        b.remove(&0);
        b.add(100);
        assert_ne!(a, b);

        let empty: HashSet<i32> = HashSet::new();
        assert_eq!(empty.hash_code(), 0);
    }

    #[test]
    fn test_hash_code_is_wrapping_sum() {
        let mut set = HashSet::with_comparator(OneBucket);
        set.add(1);
        assert_eq!(set.hash_code(), 0);

        let set: HashSet<Option<i32>> = [None, Some(3)].into_iter().collect();
        assert_eq!(set.hash_code(), 3i32.hash_code());
    }

    #[test]
    fn test_sets_nest() {
        let inner_a: HashSet<i32> = [1, 2].into_iter().collect();
        let inner_b: HashSet<i32> = [2, 1].into_iter().collect();

        let mut outer = HashSet::new();
        assert!(outer.add(inner_a));
        assert!(!outer.add(inner_b));
        assert_eq!(outer.len(), 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut set = HashSet::with_comparator(SipComparator::default());
        set.add_all(["a".to_string(), "b".to_string(), "c".to_string()]);

        let mut copy = set.clone();
        assert_eq!(copy, set);
        assert_eq!(copy.capacity(), 4);

        copy.add("d".to_string());
        assert_eq!(set.len(), 3);
        assert_eq!(copy.len(), 4);
    }

    #[test]
    fn test_from_collection() {
        let set = HashSet::from_collection(vec![5, 6, 7, 8, 9]);
        assert_eq!(set.len(), 5);
        assert_eq!(set.capacity(), 8);
        assert_eq!(set.threshold(), 6);

        let empty = HashSet::<i32>::from_collection(Vec::new());
        assert_eq!(empty.capacity(), 1);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_iter() {
        let set: HashSet<i32> = [1, 2, 3].into_iter().collect();

        let iter = set.iter();
        assert_eq!(iter.len(), 3);
        let mut values: Vec<_> = iter.copied().collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 3]);

        let mut owned: Vec<i32> = set.into_iter().collect();
        owned.sort_unstable();
        assert_eq!(owned, vec![1, 2, 3]);
    }

    #[test]
    fn test_display_and_debug() {
        let empty: HashSet<i32> = HashSet::new();
        assert_eq!(format!("{empty}"), "{}");
        assert_eq!(format!("{empty:?}"), "{}");

        let mut set = HashSet::with_comparator(OneBucket);
        set.add(1);
        set.add(2);
        assert_eq!(format!("{set}"), "{1, 2}");
        assert_eq!(format!("{set:?}"), "{1, 2}");
    }

    #[test]
    fn test_try_constructor() {
        assert!(HashSet::<i32>::try_with_capacity_and_load_factor(16, 1.0).is_ok());
        assert_eq!(
            HashSet::<i32>::try_with_capacity_and_load_factor(16, f32::INFINITY).unwrap_err(),
            CapacityError::InvalidLoadFactor(f32::INFINITY)
        );
    }

    #[test]
    fn test_comparator_accessor() {
        let set: HashSet<i32> = HashSet::new();
        assert!(core::ptr::eq(
            *set.comparator(),
            DefaultEqualityComparator::instance()
        ));
    }

    #[test]
    fn test_chain_histogram() {
        let mut set = HashSet::with_comparator(OneBucket);
        set.add_all([1, 2, 3]);
        let hist = set.chain_histogram();
        assert_eq!(hist.0[3], 1);
        assert_eq!(hist.0[0], 15);
    }

    fn check_against_model<C: EqualityComparator<i32>>(mut set: HashSet<i32, C>) {
        let mut rng = SmallRng::from_os_rng();
        let mut model = hashbrown::HashSet::new();

        for _ in 0..2000 {
            let value = rng.random_range(0..200);
            if rng.random_bool(0.65) {
                assert_eq!(set.add(value), model.insert(value));
            } else {
                assert_eq!(set.remove(&value), model.remove(&value));
            }
            assert_eq!(set.len(), model.len());
        }

        assert_eq!(set.iter().count(), model.len());
        assert!(set.capacity().is_power_of_two());
        for value in 0..200 {
            assert_eq!(set.contains(&value), model.contains(&value));
        }
    }

    #[test]
    fn test_random_ops_match_model() {
        check_against_model(HashSet::new());
        check_against_model(HashSet::with_capacity_load_factor_and_comparator(
            1,
            0.75,
            SipComparator::default(),
        ));
        check_against_model(HashSet::with_comparator(OneBucket));
    }
}
