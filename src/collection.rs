use alloc::vec::Vec;

use crate::comparator::DefaultEqualityComparator;
use crate::comparator::EqualityComparator;
use crate::object::ObjectEq;

/// Anything that can report how many elements it holds and whether it holds a
/// given one.
///
/// Bulk operations such as [`HashSet::retain_all`](crate::HashSet::retain_all)
/// accept any `Collection`, so a set can be intersected with another set, a
/// map view, or a plain slice.
///
/// # Examples
///
/// ```rust
/// use eqhash::Collection;
/// use eqhash::HashSet;
///
/// fn describe<C: Collection<i32> + ?Sized>(c: &C) -> (usize, bool) {
///     (c.len(), c.contains(&3))
/// }
///
/// let set: HashSet<i32> = [1, 2, 3].into_iter().collect();
/// assert_eq!(describe(&set), (3, true));
/// assert_eq!(describe(&[4, 5][..]), (2, false));
/// ```
pub trait Collection<T: ?Sized> {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Whether the collection holds an element equal to `value`.
    fn contains(&self, value: &T) -> bool;

    /// Whether the collection is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, O> Collection<T> for &O
where
    T: ?Sized,
    O: Collection<T> + ?Sized,
{
    fn len(&self) -> usize {
        (**self).len()
    }

    fn contains(&self, value: &T) -> bool {
        (**self).contains(value)
    }
}

// Plain sequences are scanned linearly under the default policy.
impl<T: ObjectEq> Collection<T> for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn contains(&self, value: &T) -> bool {
        let comparator = DefaultEqualityComparator::instance();
        self.iter().any(|e| comparator.equals(e, value))
    }
}

impl<T: ObjectEq, const N: usize> Collection<T> for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn contains(&self, value: &T) -> bool {
        Collection::contains(self.as_slice(), value)
    }
}

impl<T: ObjectEq> Collection<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn contains(&self, value: &T) -> bool {
        Collection::contains(self.as_slice(), value)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn count_and_probe<C: Collection<Option<i32>> + ?Sized>(c: &C) -> (usize, bool, bool) {
        (c.len(), c.contains(&None), c.contains(&Some(2)))
    }

    #[test]
    fn sequences_use_object_equality() {
        let values = vec![Some(1), None];
        assert_eq!(count_and_probe(&values), (2, true, false));
        assert_eq!(count_and_probe(values.as_slice()), (2, true, false));
        assert_eq!(count_and_probe(&[Some(2)]), (1, false, true));
    }

    #[test]
    fn empty_collections() {
        let empty: Vec<i32> = Vec::new();
        assert!(<Vec<i32> as Collection<i32>>::is_empty(&empty));
        assert!(!<Vec<i32> as Collection<i32>>::contains(&empty, &0));
    }

    #[test]
    fn references_forward() {
        let values = vec![1, 2, 3];
        let by_ref: &dyn Collection<i32> = &&values;
        assert_eq!(by_ref.len(), 3);
        assert!(by_ref.contains(&2));
    }
}
