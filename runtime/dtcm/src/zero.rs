//! Zero-fill primitive
//!
//! The region is cleared exactly once, before the first allocation. The
//! clearing itself is an external primitive (a memclr routine, a DMA
//! transfer, or a boot ROM service), so it sits behind a trait.

/// Clears a byte range
pub trait ZeroFill {
    /// Write zeros to `[addr, addr + len)`
    ///
    /// Must run to completion before returning.
    ///
    /// # Safety
    /// - The range must be valid for writes
    /// - Nothing else may access the range during the call
    unsafe fn clear(&self, addr: usize, len: usize);
}

/// Plain CPU memclr through `core::ptr::write_bytes`
#[derive(Debug, Default, Clone, Copy)]
pub struct WriteBytes;

impl ZeroFill for WriteBytes {
    unsafe fn clear(&self, addr: usize, len: usize) {
        core::ptr::write_bytes(addr as *mut u8, 0, len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_bytes_clears_range() {
        let mut buf = vec![0xA5u8; 64];
        let addr = buf.as_mut_ptr() as usize;

        unsafe { WriteBytes.clear(addr + 8, 16) };

        assert!(buf[..8].iter().all(|b| *b == 0xA5));
        assert!(buf[8..24].iter().all(|b| *b == 0));
        assert!(buf[24..].iter().all(|b| *b == 0xA5));
    }
}
