//! Typed views over reserved addresses
//!
//! This is the only module that turns an address handed out by the cursor
//! into a Rust reference. Everything above it deals in `Reservation`s and
//! `MaybeUninit`, so no type is ever read before the caller writes it.

use core::mem::MaybeUninit;

/// View a reserved address as one uninitialized `T`
///
/// # Safety
/// - `[addr, addr + size_of::<T>())` lies inside live `'static` memory
/// - `addr` is aligned for `T`
/// - The range was reserved for this call and is never handed out again
#[inline]
pub(crate) unsafe fn uninit<T>(addr: usize) -> &'static mut MaybeUninit<T> {
    &mut *(addr as *mut MaybeUninit<T>)
}

/// View a reserved address as `len` uninitialized `T`s
///
/// # Safety
/// Same as [`uninit`], for `[addr, addr + len * size_of::<T>())`.
#[inline]
pub(crate) unsafe fn uninit_slice<T>(addr: usize, len: usize) -> &'static mut [MaybeUninit<T>] {
    core::slice::from_raw_parts_mut(addr as *mut MaybeUninit<T>, len)
}
