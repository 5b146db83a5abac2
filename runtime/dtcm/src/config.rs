//! DTCM bank configuration
//!
//! The bank geometry is fixed by the boot image (the FlexRAM plugin decides
//! how much of the on-chip RAM is handed to DTCM), so the allocator only
//! consumes two build-time constants. `build.rs` generates them from
//! `KAAL_DTCM_BASE` / `KAAL_DTCM_SIZE`, falling back to the i.MX RT1060
//! defaults.
//!
//! A mismatch between `DTCM_SIZE` and the real bank is not detectable at
//! runtime. Keep the environment in sync with the image tooling.

use static_assertions::const_assert;

include!(concat!(env!("OUT_DIR"), "/memory_config.rs"));

/// Exclusive end of the DTCM bank.
pub const DTCM_END: usize = DTCM_BASE + DTCM_SIZE;

/// Data cache line size of the Cortex-M7.
pub const CACHE_LINE_SIZE: usize = 32;

const_assert!(DTCM_SIZE > 0);
const_assert!(DTCM_BASE % core::mem::size_of::<usize>() == 0);
const_assert!(DTCM_BASE.checked_add(DTCM_SIZE).is_some());
const_assert!(CACHE_LINE_SIZE.is_power_of_two());
