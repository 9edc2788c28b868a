use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::comparator::DefaultEqualityComparator;
use crate::comparator::EqualityComparator;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Seed for the value hash. Must never change between runs: set and map
        /// hash codes are sums of element hashes and have to agree across
        /// instances.
        const VALUE_HASH_SEED: u64 = 0x243f_6a88_85a3_08d3;

        #[inline(always)]
        fn value_hash_state() -> foldhash::fast::FixedState {
            foldhash::fast::FixedState::with_seed(VALUE_HASH_SEED)
        }
    } else if #[cfg(feature = "std")] {
        #[inline(always)]
        fn value_hash_state() -> core::hash::BuildHasherDefault<std::hash::DefaultHasher> {
            core::hash::BuildHasherDefault::default()
        }
    } else {
        compile_error!("eqhash needs the `foldhash` or the `std` feature to hash values");
    }
}

/// Hashes any `Hash` value to the 32-bit hash code used by the object-equality
/// contract.
///
/// The hash is deterministic for the lifetime of the build: the same value
/// always produces the same code, in every container and every process.
///
/// # Examples
///
/// ```rust
/// use eqhash::value_hash;
///
/// assert_eq!(value_hash("abc"), value_hash(&String::from("abc")));
/// ```
pub fn value_hash<T: Hash + ?Sized>(value: &T) -> i32 {
    let hash = value_hash_state().hash_one(value);
    (hash ^ (hash >> 32)) as i32
}

/// A value that takes part in hash-code/equals object equality.
///
/// Only [`hash_code`](ObjectEq::hash_code) is required. The remaining methods
/// are optional capabilities that [`DefaultEqualityComparator`] probes in this
/// order: [`is_null`](ObjectEq::is_null), then
/// [`custom_equals`](ObjectEq::custom_equals), then
/// [`sequence_equals`](ObjectEq::sequence_equals). A type that provides none
/// of them is compared by hash code alone, which reports two distinct values
/// with colliding hash codes as equal.
///
/// # Examples
///
/// ```rust
/// use eqhash::HashSet;
/// use eqhash::ObjectEq;
/// use eqhash::value_hash;
///
/// struct Point {
///     x: i32,
///     y: i32,
///     label: &'static str,
/// }
///
/// impl ObjectEq for Point {
///     fn hash_code(&self) -> i32 {
///         value_hash(&(self.x, self.y))
///     }
///
///     fn custom_equals(&self, other: &Self) -> Option<bool> {
///         Some(self.x == other.x && self.y == other.y)
///     }
/// }
///
/// let mut set = HashSet::new();
/// assert!(set.add(Point { x: 1, y: 2, label: "first" }));
/// assert!(!set.add(Point { x: 1, y: 2, label: "second" }));
/// assert_eq!(set.len(), 1);
/// ```
pub trait ObjectEq {
    /// Hash code derived from this value's own hash-contributing state.
    fn hash_code(&self) -> i32;

    /// Whether this value is the "no value" state. Null values hash to 0 and
    /// are equal only to other null values.
    fn is_null(&self) -> bool {
        false
    }

    /// Type-specific equality, or `None` if the type defines none.
    fn custom_equals(&self, other: &Self) -> Option<bool> {
        let _ = other;
        None
    }

    /// Element-wise equality for sequence types, or `None` if this is not a
    /// sequence.
    fn sequence_equals(&self, other: &Self) -> Option<bool> {
        let _ = other;
        None
    }
}

macro_rules! impl_object_eq_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ObjectEq for $ty {
                #[inline]
                fn hash_code(&self) -> i32 {
                    value_hash(self)
                }

                #[inline]
                fn custom_equals(&self, other: &Self) -> Option<bool> {
                    Some(self == other)
                }
            }
        )*
    };
}

impl_object_eq_by_value!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, char, str, String,
);

// Floats compare by bit pattern with every NaN collapsed to one, so NaN equals
// itself and 0.0 differs from -0.0.
#[inline]
fn canonical_f32(value: f32) -> u32 {
    if value.is_nan() {
        f32::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

#[inline]
fn canonical_f64(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

impl ObjectEq for f32 {
    fn hash_code(&self) -> i32 {
        value_hash(&canonical_f32(*self))
    }

    fn custom_equals(&self, other: &Self) -> Option<bool> {
        Some(canonical_f32(*self) == canonical_f32(*other))
    }
}

impl ObjectEq for f64 {
    fn hash_code(&self) -> i32 {
        value_hash(&canonical_f64(*self))
    }

    fn custom_equals(&self, other: &Self) -> Option<bool> {
        Some(canonical_f64(*self) == canonical_f64(*other))
    }
}

impl<T: ObjectEq> ObjectEq for Option<T> {
    fn hash_code(&self) -> i32 {
        self.as_ref()
            .map_or(0, |v| DefaultEqualityComparator::instance().hash_code(v))
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }

    fn custom_equals(&self, other: &Self) -> Option<bool> {
        Some(match (self, other) {
            (Some(a), Some(b)) => DefaultEqualityComparator::instance().equals(a, b),
            (None, None) => true,
            _ => false,
        })
    }
}

impl<T: ObjectEq + ?Sized> ObjectEq for &T {
    fn hash_code(&self) -> i32 {
        (**self).hash_code()
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }

    // Two references to one object are the same object.
    fn custom_equals(&self, other: &Self) -> Option<bool> {
        if core::ptr::eq(*self, *other) {
            return Some(true);
        }
        (**self).custom_equals(*other)
    }

    fn sequence_equals(&self, other: &Self) -> Option<bool> {
        (**self).sequence_equals(*other)
    }
}

impl<T: ObjectEq + ?Sized> ObjectEq for Box<T> {
    fn hash_code(&self) -> i32 {
        (**self).hash_code()
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }

    fn custom_equals(&self, other: &Self) -> Option<bool> {
        (**self).custom_equals(other)
    }

    fn sequence_equals(&self, other: &Self) -> Option<bool> {
        (**self).sequence_equals(other)
    }
}

macro_rules! impl_object_eq_for_shared {
    ($($ptr:ident),*) => {
        $(
            impl<T: ObjectEq + ?Sized> ObjectEq for $ptr<T> {
                fn hash_code(&self) -> i32 {
                    (**self).hash_code()
                }

                fn is_null(&self) -> bool {
                    (**self).is_null()
                }

                // Two handles to one allocation are the same object.
                fn custom_equals(&self, other: &Self) -> Option<bool> {
                    if $ptr::ptr_eq(self, other) {
                        return Some(true);
                    }
                    (**self).custom_equals(other)
                }

                fn sequence_equals(&self, other: &Self) -> Option<bool> {
                    (**self).sequence_equals(other)
                }
            }
        )*
    };
}

impl_object_eq_for_shared!(Rc, Arc);

fn slice_hash_code<T: ObjectEq>(items: &[T]) -> i32 {
    let comparator = DefaultEqualityComparator::instance();
    items.iter().fold(1i32, |hash, item| {
        hash.wrapping_mul(31)
            .wrapping_add(comparator.hash_code(item))
    })
}

fn slice_equals<T: ObjectEq>(a: &[T], b: &[T]) -> bool {
    let comparator = DefaultEqualityComparator::instance();
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| comparator.equals(x, y))
}

impl<T: ObjectEq> ObjectEq for [T] {
    fn hash_code(&self) -> i32 {
        slice_hash_code(self)
    }

    fn sequence_equals(&self, other: &Self) -> Option<bool> {
        Some(slice_equals(self, other))
    }
}

impl<T: ObjectEq, const N: usize> ObjectEq for [T; N] {
    fn hash_code(&self) -> i32 {
        slice_hash_code(self)
    }

    fn sequence_equals(&self, other: &Self) -> Option<bool> {
        Some(slice_equals(self, other))
    }
}

impl<T: ObjectEq> ObjectEq for Vec<T> {
    fn hash_code(&self) -> i32 {
        slice_hash_code(self)
    }

    fn sequence_equals(&self, other: &Self) -> Option<bool> {
        Some(slice_equals(self, other))
    }
}
