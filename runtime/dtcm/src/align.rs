//! Power-of-two alignment

use crate::error::{AllocError, Result};

/// A validated power-of-two alignment in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Align(usize);

impl Align {
    /// Byte alignment (no constraint)
    pub const BYTE: Align = Align(1);

    /// Validate an alignment value
    ///
    /// # Errors
    /// Returns `InvalidAlignment` unless `align` is a power of two.
    pub const fn new(align: usize) -> Result<Self> {
        if align.is_power_of_two() {
            Ok(Self(align))
        } else {
            Err(AllocError::InvalidAlignment { align })
        }
    }

    /// Natural alignment of `T`
    pub const fn of<T>() -> Self {
        Self(core::mem::align_of::<T>())
    }

    /// Alignment in bytes
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }

    /// The stricter of two alignments
    #[inline]
    pub const fn max(self, other: Align) -> Self {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    /// Round `addr` up to the next multiple of this alignment
    ///
    /// Returns `None` if the rounded address does not fit in `usize`.
    #[inline]
    pub const fn align_up(self, addr: usize) -> Option<usize> {
        let mask = self.0 - 1;
        match addr.checked_add(mask) {
            Some(bumped) => Some(bumped & !mask),
            None => None,
        }
    }
}
