//! TEAM_431: Legacy calls that exist in the numbering but have no implementation.

use linux_raw_sys::errno::ENOSYS;

use crate::syscall::SyscallResult;

/// TEAM_431: sys_ni_syscall - Reserved call without an implementation.
pub fn sys_ni_syscall(name: &str) -> SyscallResult {
    log::trace!("[SYSCALL] {}() -> ENOSYS", name);
    Err(ENOSYS)
}
