//! TEAM_431: Process groups and sessions.
//!
//! `set_process_group` reads the caller and writes another process, so it
//! takes the whole table; callers hold the table lock across the call.

use super::{Pid, ProcError, ProcessControlBlock, ProcessTable};

/// Resolve the target of a regroup request (0 = the caller) and check that it
/// may be moved: it must exist, must not lead a session, and must share the
/// caller's session.
pub fn check_regroup(table: &ProcessTable, caller: Pid, target: Pid) -> Result<Pid, ProcError> {
    let caller_session = table
        .find_by_pid(caller)
        .ok_or(ProcError::NoSuchProcess)?
        .session;

    let target = if target == 0 { caller } else { target };
    let pcb = table.find_by_pid(target).ok_or(ProcError::NoSuchProcess)?;
    if pcb.leader {
        log::debug!("[PROC] setpgid: pid {} leads session {}", pcb.pid, pcb.session);
        return Err(ProcError::PermissionDenied);
    }
    if pcb.session != caller_session {
        log::debug!(
            "[PROC] setpgid: pid {} in session {}, caller in {}",
            pcb.pid,
            pcb.session,
            caller_session
        );
        return Err(ProcError::PermissionDenied);
    }
    Ok(target)
}

/// Move `target` (0 = the caller) into group `pgrp` (0 = the caller's pid).
///
/// Refused under the rules of [`check_regroup`]. Session and leadership are
/// never changed here.
pub fn set_process_group(
    table: &mut ProcessTable,
    caller: Pid,
    target: Pid,
    pgrp: Pid,
) -> Result<(), ProcError> {
    let target = check_regroup(table, caller, target)?;
    let pgrp = if pgrp == 0 { caller } else { pgrp };
    let pcb = table
        .find_by_pid_mut(target)
        .ok_or(ProcError::NoSuchProcess)?;
    pcb.pgrp = pgrp;
    Ok(())
}

pub fn get_process_group(pcb: &ProcessControlBlock) -> Pid {
    pcb.pgrp
}

/// Make `pcb` the leader of a fresh session and process group, detached from
/// any terminal. A leader may only do this again if privileged.
pub fn start_new_session(pcb: &mut ProcessControlBlock) -> Result<Pid, ProcError> {
    if pcb.leader && !pcb.is_superuser() {
        return Err(ProcError::PermissionDenied);
    }
    pcb.leader = true;
    pcb.session = pcb.pid;
    pcb.pgrp = pcb.pid;
    pcb.tty = None;
    Ok(pcb.pgrp)
}
