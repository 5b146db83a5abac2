//! Allocation error types

use thiserror::Error;

/// Errors reported by the region allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    /// Alignment is not a power of two. This is a caller bug: the reserve
    /// path panics with this message instead of returning it.
    #[error("bad align: {align} is not a power of two")]
    InvalidAlignment { align: usize },

    /// The aligned request does not fit below the region limit.
    #[error("region exhausted (requested: {requested} bytes, align: {align}, remaining: {remaining} bytes)")]
    Exhausted {
        requested: usize,
        align: usize,
        remaining: usize,
    },

    /// Allocation attempted before the region was zeroed.
    #[error("region not initialized")]
    Uninitialized,

    /// `init` called on a region that has already been zeroed.
    #[error("region already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = core::result::Result<T, AllocError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_error_messages() {
        let err = AllocError::InvalidAlignment { align: 3 };
        assert_eq!(err.to_string(), "bad align: 3 is not a power of two");

        let err = AllocError::Exhausted {
            requested: 64,
            align: 8,
            remaining: 12,
        };
        assert!(err.to_string().contains("requested: 64 bytes"));
        assert!(err.to_string().contains("remaining: 12 bytes"));
    }
}
