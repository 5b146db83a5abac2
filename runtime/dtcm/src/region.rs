//! Permanent region allocator
//!
//! A `Region` owns a fixed span of `'static` memory and carves typed objects
//! and slices out of it with a lock-free bump cursor. Memory is never freed:
//! every successful allocation permanently transfers `[p, p + size)` to the
//! caller.
//!
//! # Lifecycle
//! ```text
//! Uninitialized --init()--> Zeroing --> Ready --> (allocations, never reset)
//! ```
//! The whole span is cleared once by `init`. Until that has finished every
//! allocation fails with `Uninitialized`, so no caller can observe a byte
//! that was not zeroed.
//!
//! # Alignment
//! Alignments must be powers of two. Anything else is a caller bug and
//! panics immediately. Typed allocations use the stricter of the requested
//! alignment and `align_of::<T>()`.

use core::mem::{size_of, MaybeUninit};
use core::ops::Range;
use core::sync::atomic::{AtomicU8, Ordering};

use crate::align::Align;
use crate::config::CACHE_LINE_SIZE;
use crate::cursor::Cursor;
use crate::error::{AllocError, Result};
use crate::raw;
use crate::zero::ZeroFill;

const UNINITIALIZED: u8 = 0;
const ZEROING: u8 = 1;
const READY: u8 = 2;

const CACHE_LINE: Align = match Align::new(CACHE_LINE_SIZE) {
    Ok(align) => align,
    Err(_) => panic!("cache line size must be a power of two"),
};

/// A reserved byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    /// Absolute start address
    pub addr: usize,
    /// Offset of `addr` from the region base
    pub offset: usize,
    /// Length in bytes
    pub len: usize,
}

impl Reservation {
    /// Exclusive end address
    #[inline]
    pub fn end(&self) -> usize {
        self.addr + self.len
    }

    /// The reserved range as offsets from the region base
    #[inline]
    pub fn offsets(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Bump allocator over a fixed memory span
pub struct Region {
    cursor: Cursor,
    state: AtomicU8,
}

impl Region {
    /// Manage an owned `'static` buffer
    ///
    /// The buffer is consumed: from now on its bytes are only reachable
    /// through allocations made from this region.
    pub fn new(memory: &'static mut [u8]) -> Self {
        let base = memory.as_mut_ptr() as usize;
        Self {
            cursor: Cursor::new(base, memory.len()),
            state: AtomicU8::new(UNINITIALIZED),
        }
    }

    /// Manage a statically mapped memory bank
    ///
    /// # Safety
    /// - `[base, base + size)` must be valid, writable memory for the whole
    ///   program lifetime
    /// - Nothing else may read or write that range
    /// - At most one `Region` may exist for it
    pub const unsafe fn from_raw_parts(base: usize, size: usize) -> Self {
        Self {
            cursor: Cursor::new(base, size),
            state: AtomicU8::new(UNINITIALIZED),
        }
    }

    /// Zero the whole region and enable allocation
    ///
    /// # Errors
    /// Returns `AlreadyInitialized` on any call after the first one. The
    /// region is never cleared twice.
    pub fn init<Z: ZeroFill + ?Sized>(&self, zero: &Z) -> Result<()> {
        self.state
            .compare_exchange(UNINITIALIZED, ZEROING, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AllocError::AlreadyInitialized)?;

        log::debug!(
            "[region] zeroing {:#x} - {:#x} ({} bytes)",
            self.base(),
            self.limit(),
            self.capacity()
        );

        // SAFETY: the constructors guarantee exclusive access to the span,
        // and no allocation can succeed before READY is published.
        unsafe { zero.clear(self.base(), self.capacity()) };

        self.state.store(READY, Ordering::Release);
        Ok(())
    }

    /// Whether `init` has completed
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }

    /// Reserve `size` raw bytes aligned to `align`
    ///
    /// # Panics
    /// Panics if `align` is not a power of two.
    ///
    /// # Errors
    /// `Uninitialized` before `init`, `Exhausted` when the request does not
    /// fit. A failed request reserves nothing.
    pub fn reserve(&self, align: usize, size: usize) -> Result<Reservation> {
        self.reserve_aligned(checked_align(align), size)
    }

    /// Reserve with an already validated alignment
    pub fn reserve_aligned(&self, align: Align, size: usize) -> Result<Reservation> {
        if !self.is_ready() {
            return Err(AllocError::Uninitialized);
        }

        // Must stay lock-free: no logging on this path.
        let addr = self.cursor.reserve(align, size)?;
        Ok(Reservation {
            addr,
            offset: addr - self.base(),
            len: size,
        })
    }

    /// Allocate storage for one `T`
    ///
    /// The memory is zeroed but the allocator performs no construction:
    /// write a value before reading it as `T`.
    ///
    /// # Panics
    /// Panics if `align` is not a power of two.
    pub fn alloc<T: 'static>(&self, align: usize) -> Result<&'static mut MaybeUninit<T>> {
        let align = checked_align(align).max(Align::of::<T>());
        let reservation = self.reserve_aligned(align, size_of::<T>())?;

        // SAFETY: fresh reservation of size_of::<T>() bytes, aligned for T.
        Ok(unsafe { raw::uninit(reservation.addr) })
    }

    /// Allocate storage for one `T` and move `value` into it
    pub fn alloc_init<T: 'static>(&self, align: usize, value: T) -> Result<&'static mut T> {
        Ok(self.alloc::<T>(align)?.write(value))
    }

    /// Allocate room for `cap` elements and return the first `len` of them
    ///
    /// All `cap` elements stay reserved as one contiguous range; the tail
    /// past `len` is not exposed by this API.
    ///
    /// # Panics
    /// Panics if `align` is not a power of two or `len > cap`.
    pub fn alloc_slice<T: 'static>(
        &self,
        align: usize,
        len: usize,
        cap: usize,
    ) -> Result<&'static mut [MaybeUninit<T>]> {
        assert!(len <= cap, "slice length {len} exceeds capacity {cap}");

        let align = checked_align(align).max(Align::of::<T>());
        let size = self.array_size::<T>(align, cap)?;
        let reservation = self.reserve_aligned(align, size)?;

        // SAFETY: fresh reservation of cap * size_of::<T>() bytes, aligned
        // for T, and len <= cap.
        Ok(unsafe { raw::uninit_slice(reservation.addr, len) })
    }

    /// Allocate `len` elements that share no data cache line with any
    /// other allocation
    ///
    /// Use for DMA buffers: the start is cache line aligned and the reserved
    /// span is rounded up to whole lines.
    pub fn alloc_cache_aligned<T: 'static>(
        &self,
        len: usize,
    ) -> Result<&'static mut [MaybeUninit<T>]> {
        let align = CACHE_LINE.max(Align::of::<T>());
        let size = self.array_size::<T>(align, len)?;
        let size = align.align_up(size).ok_or_else(|| self.exhausted(align, size))?;
        let reservation = self.reserve_aligned(align, size)?;

        // SAFETY: fresh reservation of at least len * size_of::<T>() bytes,
        // aligned for T.
        Ok(unsafe { raw::uninit_slice(reservation.addr, len) })
    }

    /// First address of the region
    #[inline]
    pub const fn base(&self) -> usize {
        self.cursor.base()
    }

    /// Exclusive end of the region
    #[inline]
    pub const fn limit(&self) -> usize {
        self.cursor.limit()
    }

    /// Total size in bytes
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    /// Bytes handed out so far, alignment padding included
    #[inline]
    pub fn used(&self) -> usize {
        self.cursor.used()
    }

    /// Bytes still available
    #[inline]
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    fn array_size<T>(&self, align: Align, count: usize) -> Result<usize> {
        size_of::<T>()
            .checked_mul(count)
            .ok_or_else(|| self.exhausted(align, size_of::<T>().saturating_mul(count)))
    }

    fn exhausted(&self, align: Align, requested: usize) -> AllocError {
        AllocError::Exhausted {
            requested,
            align: align.get(),
            remaining: self.remaining(),
        }
    }
}

impl core::fmt::Debug for Region {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Region")
            .field("base", &format_args!("{:#x}", self.base()))
            .field("limit", &format_args!("{:#x}", self.limit()))
            .field("free", &format_args!("{:#x}", self.cursor.free()))
            .field("ready", &self.is_ready())
            .finish()
    }
}

fn checked_align(align: usize) -> Align {
    match Align::new(align) {
        Ok(align) => align,
        Err(err) => panic!("{err}"),
    }
}
