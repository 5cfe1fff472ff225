//! TEAM_431: Copying to and from the calling process's memory.
//!
//! System calls never dereference user pointers themselves. Whoever enters
//! the dispatcher passes a `UserMemory` that knows how to reach the caller's
//! address space and reports unreachable ranges as faults.

use alloc::vec::Vec;

use linux_raw_sys::errno::EFAULT;
use pos_error::define_kernel_error;

define_kernel_error! {
    /// TEAM_431: User copy failures.
    pub enum UserAccessError(0x13) {
        /// Some byte of the range is not accessible
        Fault = 0x01 => "Bad user address"; EFAULT,
    }
}

/// Copy-in/copy-out access to the calling process's address space.
pub trait UserMemory {
    /// Copy `bytes` to user address `va`. Either all bytes land or none do.
    fn write_bytes(&mut self, va: u32, bytes: &[u8]) -> Result<(), UserAccessError>;

    /// Fill `buf` from user address `va`.
    fn read_bytes(&self, va: u32, buf: &mut [u8]) -> Result<(), UserAccessError>;
}

/// A flat window `[base, base + len)` of user memory backed by a byte vector.
pub struct UserWindow {
    base: u32,
    bytes: Vec<u8>,
}

impl UserWindow {
    /// Zero-filled window of `len` bytes starting at `base`.
    pub fn new(base: u32, len: usize) -> Self {
        Self {
            base,
            bytes: alloc::vec![0; len],
        }
    }

    fn range(&self, va: u32, len: usize) -> Result<core::ops::Range<usize>, UserAccessError> {
        let start = va
            .checked_sub(self.base)
            .ok_or(UserAccessError::Fault)? as usize;
        let end = start.checked_add(len).ok_or(UserAccessError::Fault)?;
        if end > self.bytes.len() {
            return Err(UserAccessError::Fault);
        }
        Ok(start..end)
    }

    /// View of `len` bytes at `va`, if inside the window.
    pub fn slice(&self, va: u32, len: usize) -> Option<&[u8]> {
        let range = self.range(va, len).ok()?;
        Some(&self.bytes[range])
    }
}

impl UserMemory for UserWindow {
    fn write_bytes(&mut self, va: u32, bytes: &[u8]) -> Result<(), UserAccessError> {
        let range = self.range(va, bytes.len())?;
        self.bytes[range].copy_from_slice(bytes);
        Ok(())
    }

    fn read_bytes(&self, va: u32, buf: &mut [u8]) -> Result<(), UserAccessError> {
        let range = self.range(va, buf.len())?;
        buf.copy_from_slice(&self.bytes[range]);
        Ok(())
    }
}
