//! Lock-free bump cursor
//!
//! The cursor is the only shared mutable state of a region. It moves forward
//! through `[base, limit)` and is updated exclusively with compare-and-swap,
//! so `reserve` can be called from any context (thread or interrupt) without
//! a lock.
//!
//! # Protocol
//! 1. Load the current `free` cursor
//! 2. Round it up to the requested alignment
//! 3. Check that `aligned + size <= limit`
//! 4. CAS `free` from the loaded value to `aligned + size`; on conflict
//!    retry with the freshly observed value
//!
//! A successful CAS hands `[aligned, aligned + size)` to the caller for good.
//! A failed bounds check leaves the cursor untouched.

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::align::Align;
use crate::error::{AllocError, Result};

/// Atomic bump cursor over an address range
#[derive(Debug)]
pub struct Cursor {
    base: usize,
    limit: usize,
    free: AtomicUsize,
}

impl Cursor {
    /// Create a cursor over `[base, base + size)`
    ///
    /// # Panics
    /// Panics (at compile time in const contexts) if the range overflows.
    pub const fn new(base: usize, size: usize) -> Self {
        let limit = match base.checked_add(size) {
            Some(limit) => limit,
            None => panic!("region overflows the address space"),
        };

        Self {
            base,
            limit,
            free: AtomicUsize::new(base),
        }
    }

    /// Reserve `size` bytes aligned to `align`
    ///
    /// Returns the start address of the reserved range.
    ///
    /// # Errors
    /// Returns `Exhausted` if the aligned range would cross the limit. The
    /// cursor is left unchanged in that case.
    pub fn reserve(&self, align: Align, size: usize) -> Result<usize> {
        let mut current = self.free.load(Ordering::Acquire);

        loop {
            let fits = align.align_up(current).and_then(|start| {
                let end = start.checked_add(size)?;
                (end <= self.limit).then_some((start, end))
            });

            let Some((start, end)) = fits else {
                return Err(AllocError::Exhausted {
                    requested: size,
                    align: align.get(),
                    remaining: self.limit - current,
                });
            };

            match self
                .free
                .compare_exchange_weak(current, end, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Ok(start),
                Err(observed) => current = observed,
            }
        }
    }

    /// First address of the range
    #[inline]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Exclusive end of the range
    #[inline]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Next unused address
    #[inline]
    pub fn free(&self) -> usize {
        self.free.load(Ordering::Acquire)
    }

    /// Total size of the range in bytes
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.limit - self.base
    }

    /// Bytes consumed so far, alignment padding included
    #[inline]
    pub fn used(&self) -> usize {
        self.free() - self.base
    }

    /// Bytes left before the limit
    #[inline]
    pub fn remaining(&self) -> usize {
        self.limit - self.free()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn align(n: usize) -> Align {
        Align::new(n).unwrap()
    }

    #[test]
    fn test_sequential_reservations() {
        let cursor = Cursor::new(0, 1024);

        assert_eq!(cursor.reserve(align(4), 100), Ok(0));
        assert_eq!(cursor.reserve(align(4), 50), Ok(100));
        assert_eq!(cursor.free(), 150);
        assert_eq!(cursor.used(), 150);
        assert_eq!(cursor.remaining(), 874);
    }

    #[test]
    fn test_padding_is_skipped() {
        let cursor = Cursor::new(0, 16);

        assert_eq!(cursor.reserve(align(8), 4), Ok(0));
        assert_eq!(cursor.reserve(align(8), 4), Ok(8));
        assert_eq!(cursor.free(), 12);
    }

    #[test]
    fn test_exhaustion_leaves_cursor_unchanged() {
        let cursor = Cursor::new(0x1000, 10);

        assert_eq!(cursor.reserve(Align::BYTE, 10), Ok(0x1000));
        assert_eq!(
            cursor.reserve(Align::BYTE, 1),
            Err(AllocError::Exhausted {
                requested: 1,
                align: 1,
                remaining: 0,
            })
        );
        assert_eq!(cursor.free(), 0x100a);
    }

    #[test]
    fn test_padding_past_limit_is_exhaustion() {
        let cursor = Cursor::new(0, 12);
        cursor.reserve(Align::BYTE, 9).unwrap();

        // Rounds up to 16, which is already past the limit
        assert!(matches!(
            cursor.reserve(align(16), 0),
            Err(AllocError::Exhausted { .. })
        ));
        assert_eq!(cursor.free(), 9);
    }

    #[test]
    fn test_huge_request_does_not_wrap() {
        let cursor = Cursor::new(usize::MAX - 64, 64);
        cursor.reserve(Align::BYTE, 1).unwrap();

        assert!(matches!(
            cursor.reserve(Align::BYTE, usize::MAX),
            Err(AllocError::Exhausted { .. })
        ));
    }

    #[test]
    fn test_zero_sized_reservation() {
        let cursor = Cursor::new(0, 8);
        cursor.reserve(Align::BYTE, 8).unwrap();

        // Nothing left, but an empty range at the limit still fits
        assert_eq!(cursor.reserve(Align::BYTE, 0), Ok(8));
        assert_eq!(cursor.free(), 8);
    }
}
