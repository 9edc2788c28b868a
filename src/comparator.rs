use crate::object::ObjectEq;

/// A pluggable hashing and equality policy attached to a container.
///
/// Implementations must keep the two methods consistent: whenever
/// `equals(a, b)` is `true`, `hash_code(a) == hash_code(b)`. Both must be total
/// and must treat the null state the same way: it hashes to 0 and equals only
/// another null value. The containers do not guard against a strategy that
/// breaks this contract.
pub trait EqualityComparator<T: ?Sized> {
    /// Hash code of `value` under this policy.
    fn hash_code(&self, value: &T) -> i32;

    /// Whether `a` and `b` are the same element under this policy.
    fn equals(&self, a: &T, b: &T) -> bool;
}

impl<T, C> EqualityComparator<T> for &C
where
    T: ?Sized,
    C: EqualityComparator<T> + ?Sized,
{
    #[inline]
    fn hash_code(&self, value: &T) -> i32 {
        (**self).hash_code(value)
    }

    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (**self).equals(a, b)
    }
}

/// The object-equality contract: identity, then null handling, then the
/// value's custom equality, then element-wise sequence comparison, then hash
/// codes.
///
/// The last step is an approximation. Two values of a type without custom
/// equality are reported equal whenever their hash codes collide.
///
/// The policy is stateless; containers share the process-wide instance
/// returned by [`DefaultEqualityComparator::instance`].
///
/// # Examples
///
/// ```rust
/// use eqhash::DefaultEqualityComparator;
/// use eqhash::EqualityComparator;
///
/// let comparator = DefaultEqualityComparator::instance();
/// assert!(comparator.equals(&Some(1), &Some(1)));
/// assert!(!comparator.equals(&Some(1), &None));
/// assert_eq!(comparator.hash_code(&None::<i32>), 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DefaultEqualityComparator;

static INSTANCE: DefaultEqualityComparator = DefaultEqualityComparator;

/// The strategy type containers use unless told otherwise.
pub type DefaultComparator = &'static DefaultEqualityComparator;

impl DefaultEqualityComparator {
    /// Returns the shared instance.
    pub fn instance() -> &'static Self {
        &INSTANCE
    }
}

impl<T: ObjectEq + ?Sized> EqualityComparator<T> for DefaultEqualityComparator {
    #[inline]
    fn hash_code(&self, value: &T) -> i32 {
        if value.is_null() {
            0
        } else {
            value.hash_code()
        }
    }

    fn equals(&self, a: &T, b: &T) -> bool {
        if core::ptr::eq(a, b) {
            return true;
        }

        match (a.is_null(), b.is_null()) {
            (false, false) => {}
            (a_null, b_null) => return a_null && b_null,
        }

        if let Some(equal) = a.custom_equals(b) {
            return equal;
        }

        if let Some(equal) = a.sequence_equals(b) {
            return equal;
        }

        self.hash_code(a) == self.hash_code(b)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    struct HashOnly(i32);

    impl ObjectEq for HashOnly {
        fn hash_code(&self) -> i32 {
            self.0 % 10
        }
    }

    struct Named {
        id: u32,
        name: &'static str,
    }

    impl ObjectEq for Named {
        fn hash_code(&self) -> i32 {
            self.id as i32
        }

        fn custom_equals(&self, other: &Self) -> Option<bool> {
            Some(self.id == other.id)
        }
    }

    struct Poisoned;

    impl ObjectEq for Poisoned {
        fn hash_code(&self) -> i32 {
            panic!("identity must short-circuit before hashing")
        }
    }

    #[test]
    fn identity_short_circuits() {
        let value = Poisoned;
        assert!(DefaultEqualityComparator.equals(&value, &value));
    }

    #[test]
    fn null_handling() {
        let comparator = DefaultEqualityComparator::instance();
        assert!(comparator.equals(&None::<i32>, &None));
        assert!(!comparator.equals(&None, &Some(0)));
        assert!(!comparator.equals(&Some(0), &None));
        assert_eq!(comparator.hash_code(&None::<i32>), 0);
    }

    #[test]
    fn custom_equality_wins() {
        let a = Named { id: 1, name: "a" };
        let b = Named { id: 1, name: "b" };
        let c = Named { id: 2, name: "a" };
        assert!(DefaultEqualityComparator.equals(&a, &b));
        assert!(!DefaultEqualityComparator.equals(&a, &c));
        assert_ne!(a.name, b.name);
    }

    #[test]
    fn sequences_compare_element_wise() {
        let comparator = DefaultEqualityComparator::instance();
        assert!(comparator.equals(&vec![1, 2, 3], &vec![1, 2, 3]));
        assert!(!comparator.equals(&vec![1, 2, 3], &vec![1, 2]));
        assert!(comparator.equals(&[Some(1), None], &[Some(1), None]));
        assert!(!comparator.equals(&[Some(1), None], &[None, Some(1)]));
    }

    #[test]
    fn hash_fallback_reports_collisions_as_equal() {
        let comparator = DefaultEqualityComparator::instance();
        assert!(comparator.equals(&HashOnly(3), &HashOnly(13)));
        assert!(!comparator.equals(&HashOnly(3), &HashOnly(4)));
    }

    #[test]
    fn references_delegate() {
        let comparator = DefaultEqualityComparator::instance();
        let by_ref: &dyn EqualityComparator<i32> = &comparator;
        assert!(by_ref.equals(&5, &5));
        assert_eq!(by_ref.hash_code(&5), 5i32.hash_code());
    }
}
