//! The chained bucket engine underneath [`HashSet`](crate::HashSet).

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::CapacityError;

/// Number of buckets a table starts with when no capacity is given.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Load factor used when none is given, or when the given one is invalid.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

#[inline(always)]
fn threshold_for(capacity: usize, load_factor: f32) -> usize {
    // Both operands are non-negative, so the cast truncates toward zero.
    (capacity as f64 * load_factor as f64) as usize
}

#[inline(always)]
fn is_valid_load_factor(load_factor: f32) -> bool {
    load_factor > 0.0 && load_factor <= 1.0
}

#[inline(always)]
fn bucket_index(hash: i32, mask: usize) -> usize {
    hash as u32 as usize & mask
}

fn allocate_buckets<V>(capacity: usize) -> Result<Vec<Vec<V>>, CapacityError> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|_| CapacityError::AllocationFailed(capacity))?;
    buckets.resize_with(capacity, Vec::new);
    Ok(buckets)
}

/// Bucket-level statistics for a table.
///
/// Only available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct BucketStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Element count at which the next insertion expands the table
    pub threshold: usize,
    /// Configured load factor
    pub load_factor: f32,
    /// Number of buckets holding at least one element
    pub occupied_buckets: usize,
    /// Length of the longest collision chain
    pub longest_chain: usize,
    /// Actual load (populated / capacity)
    pub load: f64,
}

#[cfg(any(test, feature = "stats"))]
impl BucketStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Bucket Statistics ===");
        println!(
            "Population: {}/{} buckets ({:.2}% load, threshold {} at load factor {})",
            self.populated,
            self.capacity,
            self.load * 100.0,
            self.threshold,
            self.load_factor
        );
        println!(
            "Occupied buckets: {} ({:.2}%)",
            self.occupied_buckets,
            if self.capacity == 0 {
                0.0
            } else {
                self.occupied_buckets as f64 / self.capacity as f64 * 100.0
            }
        );
        println!("Longest chain: {}", self.longest_chain);
    }
}

/// Histogram of collision-chain lengths: index `i` counts buckets holding
/// exactly `i` elements.
///
/// Only available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHistogram(pub Vec<usize>);

#[cfg(any(test, feature = "stats"))]
impl ChainHistogram {
    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.0.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!("chain histogram ({} buckets):", self.0.iter().sum::<usize>());
        for (length, &count) in self.0.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", length, "█".repeat(width), count);
        }
    }
}

/// An open-hashing table with separate chaining.
///
/// `HashTable<V>` stores values of type `V` in a power-of-two array of
/// buckets. Each bucket is a holeless list of the values whose hash maps to
/// it. Like the containers built on it, the table does not hash or compare
/// values itself: every operation takes the value's hash and an equality
/// predicate, and operations that may grow the table also take a function
/// that rehashes stored values.
///
/// The table doubles its bucket array when an insertion finds the element
/// count at the threshold, `floor(capacity * load_factor)`.
///
/// ## Example
///
/// ```rust
/// use eqhash::hash_table::Entry;
/// use eqhash::hash_table::HashTable;
/// use eqhash::value_hash;
///
/// #[derive(Debug, PartialEq)]
/// struct Person {
///     id: u64,
///     name: String,
/// }
///
/// let mut table = HashTable::new();
/// let hash = value_hash(&123u64);
///
/// match table.entry(hash, |p: &Person| p.id == 123, |p| value_hash(&p.id)) {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
/// assert_eq!(table.find(hash, |p| p.id == 123).map(|p| p.name.as_str()), Some("Alice"));
/// ```
pub struct HashTable<V> {
    buckets: Vec<Vec<V>>,
    populated: usize,
    threshold: usize,
    load_factor: f32,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field(
                "chains",
                &self.buckets.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("threshold", &self.threshold)
            .field("load_factor", &self.load_factor)
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with [`DEFAULT_INITIAL_CAPACITY`] buckets and
    /// [`DEFAULT_LOAD_FACTOR`].
    pub fn new() -> Self {
        Self::with_capacity_and_load_factor(DEFAULT_INITIAL_CAPACITY, DEFAULT_LOAD_FACTOR)
    }

    /// Creates an empty table with at least `capacity` buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use eqhash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 128);
    /// assert_eq!(table.threshold(), 96);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_load_factor(capacity, DEFAULT_LOAD_FACTOR)
    }

    /// Creates an empty table with at least `capacity` buckets and the given
    /// load factor.
    ///
    /// The capacity is rounded up to the next power of two, and is at least 1.
    /// A load factor that is NaN or outside `(0, 1]` is replaced with
    /// [`DEFAULT_LOAD_FACTOR`].
    ///
    /// A load factor small enough that `floor(capacity * load_factor)` is 0
    /// makes every insertion double the array until the threshold reaches 1.
    /// For tiny values such as `1e-9` that point lies beyond any allocatable
    /// size, so insertions eventually panic in [`expand`](Self::expand).
    ///
    /// # Panics
    ///
    /// Panics if the rounded capacity does not fit in `usize` or cannot be
    /// allocated. Use
    /// [`try_with_capacity_and_load_factor`](Self::try_with_capacity_and_load_factor)
    /// to handle that case.
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Self {
        let load_factor = if is_valid_load_factor(load_factor) {
            load_factor
        } else {
            DEFAULT_LOAD_FACTOR
        };

        match Self::try_with_capacity_and_load_factor(capacity, load_factor) {
            Ok(table) => table,
            Err(error) => panic!("{error}"),
        }
    }

    /// Fallible form of
    /// [`with_capacity_and_load_factor`](Self::with_capacity_and_load_factor).
    ///
    /// Invalid load factors are reported instead of replaced. A valid but tiny
    /// load factor is accepted and grows the table as described on
    /// [`with_capacity_and_load_factor`](Self::with_capacity_and_load_factor).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use eqhash::CapacityError;
    /// # use eqhash::hash_table::HashTable;
    /// #
    /// let table = HashTable::<u8>::try_with_capacity_and_load_factor(10, 0.5).unwrap();
    /// assert_eq!(table.capacity(), 16);
    /// assert_eq!(table.threshold(), 8);
    ///
    /// assert_eq!(
    ///     HashTable::<u8>::try_with_capacity_and_load_factor(10, 1.5).unwrap_err(),
    ///     CapacityError::InvalidLoadFactor(1.5)
    /// );
    /// ```
    pub fn try_with_capacity_and_load_factor(
        capacity: usize,
        load_factor: f32,
    ) -> Result<Self, CapacityError> {
        if !is_valid_load_factor(load_factor) {
            return Err(CapacityError::InvalidLoadFactor(load_factor));
        }

        let capacity = capacity
            .max(1)
            .checked_next_power_of_two()
            .ok_or(CapacityError::CapacityOverflow(capacity))?;

        Ok(Self {
            buckets: allocate_buckets(capacity)?,
            populated: 0,
            threshold: threshold_for(capacity, load_factor),
            load_factor,
        })
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the element count at which the next insertion expands the
    /// table.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns the load factor fixed at construction.
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.buckets.len() - 1
    }

    /// Returns a reference to the first value in `hash`'s bucket matching
    /// `eq`.
    pub fn find(&self, hash: i32, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let bucket = &self.buckets[bucket_index(hash, self.mask())];
        bucket.iter().find(|&v| eq(v))
    }

    /// Returns a mutable reference to the first value in `hash`'s bucket
    /// matching `eq`.
    ///
    /// The caller must not change anything that contributes to the value's
    /// hash or equality.
    pub fn find_mut(&mut self, hash: i32, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let index = bucket_index(hash, self.mask());
        self.buckets[index].iter_mut().find(|v| eq(&**v))
    }

    /// Gets the entry for the given hash and equality predicate.
    ///
    /// If the element count has reached the threshold, the table first
    /// doubles its capacity, using `hasher` to recompute every stored value's
    /// bucket.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use eqhash::hash_table::Entry;
    /// # use eqhash::hash_table::HashTable;
    /// # use eqhash::value_hash;
    /// #
    /// let mut table = HashTable::new();
    /// let hash = value_hash("hello");
    ///
    /// match table.entry(hash, |s: &String| s == "hello", |s| value_hash(s)) {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         entry.get_mut().push('!');
    ///     }
    /// }
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn entry(
        &mut self,
        hash: i32,
        eq: impl Fn(&V) -> bool,
        hasher: impl Fn(&V) -> i32,
    ) -> Entry<'_, V> {
        if self.populated >= self.threshold {
            self.expand(hasher);
        }

        let index = bucket_index(hash, self.mask());
        let Self {
            buckets, populated, ..
        } = self;
        let bucket = &mut buckets[index];
        match bucket.iter().position(|v| eq(v)) {
            Some(slot) => Entry::Occupied(OccupiedEntry {
                bucket,
                slot,
                populated,
            }),
            None => Entry::Vacant(VacantEntry { bucket, populated }),
        }
    }

    /// Removes and returns the first value in `hash`'s bucket matching `eq`.
    ///
    /// Later values in the bucket shift down by one, keeping their order.
    pub fn remove(&mut self, hash: i32, eq: impl Fn(&V) -> bool) -> Option<V> {
        let index = bucket_index(hash, self.mask());
        let bucket = &mut self.buckets[index];
        let slot = bucket.iter().position(|v| eq(v))?;
        self.populated -= 1;
        Some(bucket.remove(slot))
    }

    /// Removes and returns the first value, in iteration order, for which `f`
    /// returns `true`.
    pub fn remove_first(&mut self, mut f: impl FnMut(&V) -> bool) -> Option<V> {
        for bucket in &mut self.buckets {
            if let Some(slot) = bucket.iter().position(&mut f) {
                self.populated -= 1;
                return Some(bucket.remove(slot));
            }
        }
        None
    }

    /// Keeps only the values for which `f` returns `true`.
    ///
    /// Each bucket is compacted in place; kept values keep their relative
    /// order inside their bucket.
    pub fn retain(&mut self, mut f: impl FnMut(&V) -> bool) {
        let mut kept = 0;
        for bucket in &mut self.buckets {
            bucket.retain(|v| f(v));
            kept += bucket.len();
        }
        self.populated = kept;
    }

    /// Doubles the bucket array, rehashing every value with `hasher`.
    ///
    /// The replacement array is filled completely before it takes the old
    /// one's place. Values are moved out of the old buckets as they are
    /// rehashed.
    ///
    /// # Panics
    ///
    /// Panics if the doubled capacity overflows `usize` or cannot be
    /// allocated. If `hasher` panics, the values moved so far are dropped
    /// with the unfinished replacement and [`len`](Self::len) no longer
    /// matches the stored count.
    pub fn expand(&mut self, hasher: impl Fn(&V) -> i32) {
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity
            .checked_mul(2)
            .ok_or(CapacityError::CapacityOverflow(old_capacity))
            .and_then(allocate_buckets::<V>);
        let mut replacement = match new_capacity {
            Ok(buckets) => buckets,
            Err(error) => panic!("{error}"),
        };

        let mask = replacement.len() - 1;
        for bucket in &mut self.buckets {
            for value in bucket.drain(..) {
                replacement[bucket_index(hasher(&value), mask)].push(value);
            }
        }

        self.buckets = replacement;
        self.threshold = threshold_for(self.buckets.len(), self.load_factor);

        crate::debug_event!(
            old_capacity,
            new_capacity = self.buckets.len(),
            populated = self.populated,
            threshold = self.threshold,
            "expanded bucket array"
        );
    }

    /// Removes all values, keeping the bucket array.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.populated = 0;
    }

    /// Returns an iterator over all values: buckets in index order, each
    /// bucket front to back.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.buckets.iter().flatten(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over mutable references to all values, in the same
    /// order as [`iter`](Self::iter).
    ///
    /// The caller must not change anything that contributes to a value's hash
    /// or equality.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            inner: self.buckets.iter_mut().flatten(),
            remaining: self.populated,
        }
    }

    /// Returns the bucket statistics of the table.
    #[cfg(any(test, feature = "stats"))]
    pub fn bucket_stats(&self) -> BucketStats {
        BucketStats {
            populated: self.populated,
            capacity: self.buckets.len(),
            threshold: self.threshold,
            load_factor: self.load_factor,
            occupied_buckets: self.buckets.iter().filter(|b| !b.is_empty()).count(),
            longest_chain: self.buckets.iter().map(Vec::len).max().unwrap_or(0),
            load: self.populated as f64 / self.buckets.len() as f64,
        }
    }

    /// Computes the histogram of collision-chain lengths.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> ChainHistogram {
        let longest = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        let mut hist = alloc::vec![0usize; longest + 1];
        for bucket in &self.buckets {
            hist[bucket.len()] += 1;
        }
        ChainHistogram(hist)
    }
}

/// A view into a single entry in the table, which may be vacant or occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// No value in the bucket matched
    Vacant(VacantEntry<'a, V>),
    /// A matching value is present
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the table.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the table.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }
}

/// A vacant entry: the bucket holds no matching value.
pub struct VacantEntry<'a, V> {
    bucket: &'a mut Vec<V>,
    populated: &'a mut usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Appends `value` to the bucket and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        let slot = self.bucket.len();
        self.bucket.push(value);
        *self.populated += 1;
        &mut self.bucket[slot]
    }
}

/// An occupied entry: the bucket holds a matching value.
pub struct OccupiedEntry<'a, V> {
    bucket: &'a mut Vec<V>,
    slot: usize,
    populated: &'a mut usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Returns a reference to the matching value.
    pub fn get(&self) -> &V {
        &self.bucket[self.slot]
    }

    /// Returns a mutable reference to the matching value.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.bucket[self.slot]
    }

    /// Converts the entry into a mutable reference with the table's lifetime.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.bucket[self.slot]
    }

    /// Removes the matching value, shifting later bucket values down.
    pub fn remove(self) -> V {
        *self.populated -= 1;
        self.bucket.remove(self.slot)
    }
}

/// An iterator over the values in a [`HashTable`].
pub struct Iter<'a, V> {
    inner: core::iter::Flatten<core::slice::Iter<'a, Vec<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.inner.next()?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
            remaining: self.remaining,
        }
    }
}

/// A mutable iterator over the values in a [`HashTable`].
pub struct IterMut<'a, V> {
    inner: core::iter::Flatten<core::slice::IterMut<'a, Vec<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.inner.next()?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

/// A consuming iterator over the values in a [`HashTable`].
pub struct IntoIter<V> {
    inner: core::iter::Flatten<alloc::vec::IntoIter<Vec<V>>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.inner.next()?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.populated,
            inner: self.buckets.into_iter().flatten(),
        }
    }
}
