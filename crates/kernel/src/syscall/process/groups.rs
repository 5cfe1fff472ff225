//! Process group and session syscalls.
//!
//! TEAM_394: Process group and session management.
//! TEAM_431: Table-wide lookups; the table lock is held across every
//! lookup-and-mutate sequence.

use linux_raw_sys::errno::ESRCH;
use pos_hal::PhysicalMemory;

use crate::kernel::Kernel;
use crate::syscall::{SyscallResult, SyscallResultExt};
use crate::task::session::{
    check_regroup, get_process_group, set_process_group, start_new_session,
};
use crate::task::{Pid, ProcError};

/// TEAM_394: sys_setpgid - Set process group ID.
///
/// # Arguments
/// * `pid` - Process to modify (0 = calling process)
/// * `pgid` - New process group (0 = calling process's pid)
///
/// # Returns
/// 0 on success, EPERM if the target leads a session, sits in another
/// session or `pgid` is negative, ESRCH if no such process.
pub fn sys_setpgid<M: PhysicalMemory>(
    kernel: &Kernel<M>,
    caller: Pid,
    pid: i32,
    pgid: i32,
) -> SyscallResult {
    // A negative pid can never name a process.
    let target = Pid::try_from(pid).map_err(|_| ESRCH)?;

    let result = {
        let mut table = kernel.processes();
        match Pid::try_from(pgid) {
            Ok(pgrp) => set_process_group(&mut table, caller, target, pgrp),
            // No group has a negative id: refused once the target checks pass.
            Err(_) => check_regroup(&table, caller, target)
                .and(Err(ProcError::PermissionDenied)),
        }
    };
    log::trace!("[SYSCALL] setpgid({}, {}) -> {:?}", pid, pgid, result);
    result.to_syscall_result(|()| 0)
}

/// TEAM_394: sys_getpgrp - Get process group of calling process.
pub fn sys_getpgrp<M: PhysicalMemory>(kernel: &Kernel<M>, caller: Pid) -> SyscallResult {
    kernel
        .with_process(caller, |p| get_process_group(p))
        .to_syscall_result(i64::from)
}

/// TEAM_394: sys_setsid - Create new session.
///
/// # Returns
/// The new process group (the caller's pid), or EPERM if the caller already
/// leads a session and is not privileged.
pub fn sys_setsid<M: PhysicalMemory>(kernel: &Kernel<M>, caller: Pid) -> SyscallResult {
    let result = kernel
        .with_process(caller, start_new_session)
        .and_then(|r| r);
    log::trace!("[SYSCALL] setsid() -> {:?}", result);
    result.to_syscall_result(i64::from)
}
