//! Process identity syscalls.
//!
//! TEAM_350: User/group identity syscalls.
//! TEAM_406: System identification (uname, umask).
//! TEAM_431: Real credentials and privilege rules; every call names its caller.

use linux_raw_sys::errno::EINVAL;
use pos_hal::PhysicalMemory;

use crate::kernel::Kernel;
use crate::memory::UserMemory;
use crate::syscall::{SyscallResult, SyscallResultExt, Utsname, id_arg, write_struct_to_user};
use crate::task::{Credentials, Pid, ProcError};

// ============================================================================
// TEAM_431: Identity getters
// ============================================================================

fn read_creds<M: PhysicalMemory, R>(
    kernel: &Kernel<M>,
    caller: Pid,
    f: impl FnOnce(&Credentials) -> R,
) -> Result<R, ProcError> {
    kernel.with_process(caller, |p| f(&p.creds))
}

/// TEAM_350: sys_getpid - Get process ID.
pub fn sys_getpid<M: PhysicalMemory>(kernel: &Kernel<M>, caller: Pid) -> SyscallResult {
    kernel
        .with_process(caller, |p| p.pid)
        .to_syscall_result(i64::from)
}

/// TEAM_350: sys_getuid - Get real user ID.
pub fn sys_getuid<M: PhysicalMemory>(kernel: &Kernel<M>, caller: Pid) -> SyscallResult {
    read_creds(kernel, caller, |c| c.uid).to_syscall_result(i64::from)
}

/// TEAM_350: sys_geteuid - Get effective user ID.
pub fn sys_geteuid<M: PhysicalMemory>(kernel: &Kernel<M>, caller: Pid) -> SyscallResult {
    read_creds(kernel, caller, |c| c.euid).to_syscall_result(i64::from)
}

/// TEAM_350: sys_getgid - Get real group ID.
pub fn sys_getgid<M: PhysicalMemory>(kernel: &Kernel<M>, caller: Pid) -> SyscallResult {
    read_creds(kernel, caller, |c| c.gid).to_syscall_result(i64::from)
}

/// TEAM_350: sys_getegid - Get effective group ID.
pub fn sys_getegid<M: PhysicalMemory>(kernel: &Kernel<M>, caller: Pid) -> SyscallResult {
    read_creds(kernel, caller, |c| c.egid).to_syscall_result(i64::from)
}

// ============================================================================
// TEAM_431: Identity setters
// ============================================================================

/// TEAM_431: sys_setregid - Set real and/or effective group ID.
///
/// A zero or negative argument leaves that id unchanged.
///
/// # Returns
/// 0 on success, EPERM if a privilege rule refuses either half.
pub fn sys_setregid<M: PhysicalMemory>(
    kernel: &Kernel<M>,
    caller: Pid,
    rgid: i32,
    egid: i32,
) -> SyscallResult {
    let result = kernel
        .with_process(caller, |p| {
            p.creds
                .set_real_and_effective_gid(id_arg(rgid), id_arg(egid))
        })
        .and_then(|r| r);
    log::trace!("[SYSCALL] setregid({}, {}) -> {:?}", rgid, egid, result);
    result.to_syscall_result(|()| 0)
}

/// TEAM_431: sys_setgid - setregid(gid, gid).
pub fn sys_setgid<M: PhysicalMemory>(kernel: &Kernel<M>, caller: Pid, gid: i32) -> SyscallResult {
    sys_setregid(kernel, caller, gid, gid)
}

/// TEAM_431: sys_setreuid - Set real and/or effective user ID.
///
/// A zero or negative argument leaves that id unchanged. If the effective half
/// is refused, the real uid keeps its value from before the call.
///
/// # Returns
/// 0 on success, EPERM if a privilege rule refuses either half.
pub fn sys_setreuid<M: PhysicalMemory>(
    kernel: &Kernel<M>,
    caller: Pid,
    ruid: i32,
    euid: i32,
) -> SyscallResult {
    let result = kernel
        .with_process(caller, |p| {
            p.creds
                .set_real_and_effective_uid(id_arg(ruid), id_arg(euid))
        })
        .and_then(|r| r);
    log::trace!("[SYSCALL] setreuid({}, {}) -> {:?}", ruid, euid, result);
    result.to_syscall_result(|()| 0)
}

/// TEAM_431: sys_setuid - setreuid(uid, uid).
pub fn sys_setuid<M: PhysicalMemory>(kernel: &Kernel<M>, caller: Pid, uid: i32) -> SyscallResult {
    sys_setreuid(kernel, caller, uid, uid)
}

// ============================================================================
// TEAM_406: System identification and file creation mask
// ============================================================================

/// TEAM_406: sys_uname - Get system identification.
///
/// # Arguments
/// * `buf` - User pointer to utsname structure
///
/// # Returns
/// Ok(0) on success, EINVAL for a null buffer, EFAULT if it cannot be written.
///
/// A null buffer deliberately gets the POSIX EINVAL, not a kernel-private
/// catch-all code such as `ERROR` (99).
pub fn sys_uname<M: PhysicalMemory>(
    kernel: &Kernel<M>,
    user: &mut dyn UserMemory,
    buf: u32,
) -> SyscallResult {
    if buf == 0 {
        return Err(EINVAL);
    }
    let utsname = Utsname::from(&kernel.config().uts);
    write_struct_to_user(user, buf, &utsname).to_syscall_result(|()| 0)?;
    log::trace!("[SYSCALL] uname(0x{:x}) -> 0", buf);
    Ok(0)
}

/// TEAM_406: sys_umask - Set file creation mask.
///
/// # Returns
/// Previous umask value.
pub fn sys_umask<M: PhysicalMemory>(kernel: &Kernel<M>, caller: Pid, mask: u32) -> SyscallResult {
    let old = kernel
        .with_process(caller, |p| {
            let old = p.umask;
            p.umask = (mask & 0o777) as u16;
            old
        })
        .to_syscall_result(i64::from)?;
    log::trace!("[SYSCALL] umask(0o{:o}) -> 0o{:o}", mask, old);
    Ok(old)
}
