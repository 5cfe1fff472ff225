//! TEAM_413: Syscall Helper Abstractions
//!
//! Common pieces shared by the syscall implementations:
//!
//! - `write_struct_to_user()` / `read_struct_from_user()`: struct copies through `UserMemory`
//! - `id_arg()`: the "0 or less means unchanged" id convention
//! - `SyscallResultExt`: kernel error enums to errno

use bytemuck::Pod;
use linux_raw_sys::errno::EINVAL;

use crate::memory::{UserAccessError, UserMemory};
use crate::syscall::SyscallResult;
use crate::task::{ProcError, TableError};

/// TEAM_431: Copy `value` to user address `va`.
pub fn write_struct_to_user<T: Pod>(
    user: &mut dyn UserMemory,
    va: u32,
    value: &T,
) -> Result<(), UserAccessError> {
    user.write_bytes(va, bytemuck::bytes_of(value))
}

/// TEAM_431: Read a `T` from user address `va`.
pub fn read_struct_from_user<T: Pod>(
    user: &dyn UserMemory,
    va: u32,
) -> Result<T, UserAccessError> {
    let mut value = T::zeroed();
    user.read_bytes(va, bytemuck::bytes_of_mut(&mut value))?;
    Ok(value)
}

/// Raw id argument to the typed API: zero or negative leaves the id unchanged.
pub fn id_arg(raw: i32) -> Option<u32> {
    u32::try_from(raw).ok().filter(|&id| id > 0)
}

/// Errno an error is reported as at the syscall boundary.
pub trait AsErrno {
    fn as_errno(&self) -> u32;
}

macro_rules! impl_as_errno {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AsErrno for $ty {
                fn as_errno(&self) -> u32 {
                    self.errno().unwrap_or(EINVAL)
                }
            }
        )*
    };
}

impl_as_errno!(ProcError, TableError, UserAccessError);

/// TEAM_413: Result conversion helper for syscalls.
pub trait SyscallResultExt<T> {
    /// On success, calls the provided closure to compute the return value.
    /// On error, converts the kernel error to its errno.
    fn to_syscall_result<F: FnOnce(T) -> i64>(self, on_success: F) -> SyscallResult;
}

impl<T, E: AsErrno> SyscallResultExt<T> for Result<T, E> {
    fn to_syscall_result<F: FnOnce(T) -> i64>(self, on_success: F) -> SyscallResult {
        match self {
            Ok(v) => Ok(on_success(v)),
            Err(e) => Err(e.as_errno()),
        }
    }
}
