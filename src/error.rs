//! Errors surfaced by fallible construction.

/// Errors reported by the fallible constructors.
///
/// Container operations never fail: a lookup miss is `None` or `false`. Only
/// sizing a new bucket array can go wrong, and only the `try_*` constructors
/// surface it.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CapacityError {
    /// The load factor is NaN or outside `(0, 1]`.
    #[error("load factor {0} is outside (0, 1]")]
    InvalidLoadFactor(f32),

    /// The requested capacity has no power of two above it in `usize`.
    #[error("capacity {0} cannot be rounded up to a power of two")]
    CapacityOverflow(usize),

    /// The allocator refused the bucket array.
    #[error("failed to allocate {0} buckets")]
    AllocationFailed(usize),
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            CapacityError::InvalidLoadFactor(1.5).to_string(),
            "load factor 1.5 is outside (0, 1]"
        );
        assert_eq!(
            CapacityError::CapacityOverflow(usize::MAX).to_string(),
            alloc::format!("capacity {} cannot be rounded up to a power of two", usize::MAX)
        );
        assert_eq!(
            CapacityError::AllocationFailed(8).to_string(),
            "failed to allocate 8 buckets"
        );
    }
}
