//! KaaL DTCM - permanent allocation in tightly-coupled memory
//!
//! # Purpose
//! Carves long-lived typed objects and slices out of a small, statically
//! mapped on-chip memory bank (the Cortex-M7 DTCM). Allocation is O(1) and
//! wait-free in the uncontended case; memory is never freed.
//!
//! # Integration Points
//! - Depends on: build-time bank geometry (`KAAL_DTCM_BASE`, `KAAL_DTCM_SIZE`)
//! - Provides to: drivers and board init code that need fast, fixed memory
//! - External primitive: a zero-fill routine, run once at boot
//!
//! # Architecture
//! ```text
//! bank (DTCM singleton, fatal on error)
//! └── Region (init state machine + typed API)
//!     ├── Cursor (AtomicUsize CAS bump over [base, limit))
//!     ├── ZeroFill (one-time clear)
//!     └── raw (address -> &'static mut MaybeUninit<T>)
//! ```
//!
//! # Testing Strategy
//! - Unit tests: cursor arithmetic, alignment, init state machine
//! - Integration tests: scenarios, zero-before-use, concurrent reservation
//! - Property tests: alignment, disjointness, monotonic cursor, exhaustion

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod align;
pub mod bank;
pub mod config;
pub mod cursor;
pub mod error;
mod raw;
pub mod region;
pub mod zero;

pub use align::Align;
pub use config::{CACHE_LINE_SIZE, DTCM_BASE, DTCM_END, DTCM_SIZE};
pub use cursor::Cursor;
pub use error::{AllocError, Result};
pub use region::{Region, Reservation};
pub use zero::{WriteBytes, ZeroFill};
