//! Common syscall type definitions (SSOT).
//!
//! TEAM_431: Structures copied out to user memory, laid out as the i386 ABI
//! expects them.

use bytemuck::{Pod, Zeroable};

use crate::config::UtsInfo;

/// Length of each `uname` field, NUL included.
pub const UTS_FIELD_LEN: usize = 9;

/// Process times in clock ticks.
///
/// Used by: times
///
/// Layout: 16 bytes (4 x u32).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Tms {
    pub tms_utime: u32,
    pub tms_stime: u32,
    pub tms_cutime: u32,
    pub tms_cstime: u32,
}

/// System identification.
///
/// Used by: uname
///
/// Layout: 45 bytes (5 NUL-padded 9-byte fields).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Utsname {
    pub sysname: [u8; UTS_FIELD_LEN],
    pub nodename: [u8; UTS_FIELD_LEN],
    pub release: [u8; UTS_FIELD_LEN],
    pub version: [u8; UTS_FIELD_LEN],
    pub machine: [u8; UTS_FIELD_LEN],
}

/// Copy a string into a fixed-size array, null-terminated and truncated to fit.
fn str_to_array<const N: usize>(s: &str) -> [u8; N] {
    let mut arr = [0u8; N];
    let bytes = s.as_bytes();
    let len = bytes.len().min(N.saturating_sub(1));
    arr[..len].copy_from_slice(&bytes[..len]);
    arr
}

impl From<&UtsInfo> for Utsname {
    fn from(uts: &UtsInfo) -> Self {
        Self {
            sysname: str_to_array(uts.sysname),
            nodename: str_to_array(uts.nodename),
            release: str_to_array(uts.release),
            version: str_to_array(uts.version),
            machine: str_to_array(uts.machine),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abi_sizes() {
        assert_eq!(core::mem::size_of::<Tms>(), 16);
        assert_eq!(core::mem::size_of::<Utsname>(), 45);
    }

    #[test]
    fn test_long_field_truncated_with_nul() {
        let uts = UtsInfo {
            sysname: "abcdefghijkl",
            ..UtsInfo::new()
        };
        let name = Utsname::from(&uts);
        assert_eq!(&name.sysname, b"abcdefgh\0");
        assert_eq!(&name.machine[..5], b"i386\0");
    }
}
