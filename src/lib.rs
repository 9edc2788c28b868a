#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

// Event macros compile to nothing unless the `tracing` feature is enabled.
macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
    };
}

macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
    };
}

pub(crate) use debug_event;
pub(crate) use trace_event;

/// Live views over a map's keys and values.
pub mod view;

/// The "count plus membership" capability accepted by bulk operations.
pub mod collection;

/// Equality strategies.
pub mod comparator;

/// Map entries and the key-only and value-only strategies built on them.
pub mod entry;

pub mod error;

/// A hash map stored as a hash set of entries compared by key.
pub mod hash_map;

/// A hash set parameterised by an equality strategy.
pub mod hash_set;

pub mod hash_table;

/// The value-side object-equality capability and the value hash.
pub mod object;

pub use collection::Collection;
pub use comparator::DefaultComparator;
pub use comparator::DefaultEqualityComparator;
pub use comparator::EqualityComparator;
pub use entry::Entry;
pub use entry::KeyEqualityComparator;
pub use entry::ValueEqualityComparator;
pub use error::CapacityError;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use object::ObjectEq;
pub use object::value_hash;
pub use view::KeySet;
pub use view::Values;
