//! The DTCM bank
//!
//! One process-wide region over the tightly-coupled data memory. Board
//! startup calls [`init`] once; after that any context may carve long-lived
//! objects (USB queue heads, DMA descriptors, ISR state) out of it.
//!
//! There is no fallback memory: running out of DTCM is a configuration bug,
//! so these helpers log and panic instead of returning an error.
//!
//! The region itself is private, so the `unsafe` [`init`] is the only way to
//! zero it:
//!
//! ```compile_fail
//! use dtcm::WriteBytes;
//!
//! dtcm::bank::DTCM.init(&WriteBytes).unwrap();
//! ```
//!
//! The `*_in` variants run the same fatal policy against any region.

use core::mem::MaybeUninit;

use crate::config::{DTCM_BASE, DTCM_SIZE};
use crate::error::Result;
use crate::region::Region;
use crate::zero::{WriteBytes, ZeroFill};

// SAFETY: the bank is reserved for this allocator by the linker script and
// is mapped for the whole lifetime of the image.
static DTCM: Region = unsafe { Region::from_raw_parts(DTCM_BASE, DTCM_SIZE) };

/// Zero the bank and enable allocation
///
/// # Safety
/// - Must run on the target, where `DTCM_BASE..DTCM_END` is real memory
/// - Must be called exactly once during boot, before any allocation
///
/// # Panics
/// Panics on a second call.
pub unsafe fn init() {
    init_in(&DTCM, &WriteBytes);
}

/// Like `new(T)`, in DTCM, aligned to `align`
pub fn new<T: 'static>(align: usize) -> &'static mut MaybeUninit<T> {
    new_in(&DTCM, align)
}

/// Move `value` into DTCM, aligned to `align`
pub fn new_init<T: 'static>(align: usize, value: T) -> &'static mut T {
    new_init_in(&DTCM, align, value)
}

/// Like `make([]T, len, cap)`, in DTCM, aligned to `align`
pub fn make_slice<T: 'static>(align: usize, len: usize, cap: usize) -> &'static mut [MaybeUninit<T>] {
    make_slice_in(&DTCM, align, len, cap)
}

/// A slice in DTCM that shares no cache line with anything else
pub fn cache_aligned<T: 'static>(len: usize) -> &'static mut [MaybeUninit<T>] {
    cache_aligned_in(&DTCM, len)
}

/// Bytes used and total bank size
pub fn stats() -> (usize, usize) {
    (DTCM.used(), DTCM.capacity())
}

/// Zero `region` once; a second call is a boot sequencing bug
pub fn init_in<Z: ZeroFill + ?Sized>(region: &Region, zero: &Z) {
    if let Err(err) = region.init(zero) {
        log::error!("FATAL: {} at {:#x}", err, region.base());
        panic!("DTCM init: {err}");
    }
}

/// [`new`] against an explicit region
pub fn new_in<T: 'static>(region: &Region, align: usize) -> &'static mut MaybeUninit<T> {
    fatal(region, region.alloc(align))
}

/// [`new_init`] against an explicit region
pub fn new_init_in<T: 'static>(region: &Region, align: usize, value: T) -> &'static mut T {
    fatal(region, region.alloc_init(align, value))
}

/// [`make_slice`] against an explicit region
pub fn make_slice_in<T: 'static>(
    region: &Region,
    align: usize,
    len: usize,
    cap: usize,
) -> &'static mut [MaybeUninit<T>] {
    fatal(region, region.alloc_slice(align, len, cap))
}

/// [`cache_aligned`] against an explicit region
pub fn cache_aligned_in<T: 'static>(region: &Region, len: usize) -> &'static mut [MaybeUninit<T>] {
    fatal(region, region.alloc_cache_aligned(len))
}

fn fatal<T>(region: &Region, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            log::error!("FATAL: DTCM allocation failed: {}", err);
            log::error!("  Used: {} of {} bytes", region.used(), region.capacity());
            panic!("out of DTCM: {err}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CACHE_LINE_SIZE, DTCM_END};
    use std::boxed::Box;

    // The bank only exists on the target, so host tests never call `init`
    // and exercise the fatal policy on leaked host regions instead.

    #[repr(C, align(64))]
    struct Backing<const N: usize>([u8; N]);

    fn host_region<const N: usize>() -> Region {
        let Backing(bytes) = Box::leak(Box::new(Backing([0x77u8; N])));
        Region::new(bytes)
    }

    fn ready<const N: usize>() -> Region {
        let region = host_region::<N>();
        init_in(&region, &WriteBytes);
        region
    }

    #[test]
    fn test_bank_geometry() {
        assert_eq!(DTCM.base(), DTCM_BASE);
        assert_eq!(DTCM.limit(), DTCM_END);
        assert_eq!(stats(), (0, DTCM_SIZE));
    }

    #[test]
    #[should_panic(expected = "out of DTCM: region not initialized")]
    fn test_allocation_before_init_is_fatal() {
        let _ = new::<u32>(4);
    }

    #[test]
    #[should_panic(expected = "DTCM init: region already initialized")]
    fn test_double_init_is_fatal() {
        let region = ready::<64>();
        init_in(&region, &WriteBytes);
    }

    #[test]
    fn test_wrappers_allocate() {
        let region = ready::<512>();

        let cell = new_in::<u64>(&region, 8);
        assert_eq!(unsafe { cell.assume_init_read() }, 0);

        let value = new_init_in(&region, 16, 0xDEAD_BEEFu32);
        assert_eq!(*value, 0xDEAD_BEEF);
        assert_eq!(value as *mut u32 as usize % 16, 0);

        let before = region.used();
        let slice = make_slice_in::<u16>(&region, 2, 3, 8);
        assert_eq!(slice.len(), 3);
        assert!(region.used() >= before + 16);

        let buf = cache_aligned_in::<u8>(&region, 33);
        assert_eq!(buf.len(), 33);
        assert_eq!(buf.as_ptr() as usize % CACHE_LINE_SIZE, 0);
        assert_eq!(region.used() % CACHE_LINE_SIZE, 0);
    }

    #[test]
    #[should_panic(expected = "out of DTCM: region exhausted")]
    fn test_exhaustion_is_fatal() {
        let region = ready::<64>();
        let _ = make_slice_in::<u8>(&region, 1, 64, 64);
        let _ = new_in::<u8>(&region, 1);
    }

    #[test]
    #[should_panic(expected = "out of DTCM: region exhausted")]
    fn test_cache_aligned_exhaustion_is_fatal() {
        let region = ready::<64>();
        let _ = cache_aligned_in::<u8>(&region, 65);
    }

    #[test]
    #[should_panic(expected = "out of DTCM: region exhausted")]
    fn test_new_init_exhaustion_is_fatal() {
        let region = ready::<8>();
        let _ = new_init_in(&region, 8, [0u64; 2]);
    }
}
