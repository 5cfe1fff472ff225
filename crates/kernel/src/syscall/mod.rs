//! TEAM_431: System-call layer.
//!
//! Every handler returns `SyscallResult` (errno on the error side); the
//! dispatcher folds that into the `value | -errno` ABI word.

use linux_raw_sys::errno::{ENOSYS, ESRCH};
use pos_hal::PhysicalMemory;

use crate::kernel::Kernel;
use crate::memory::UserMemory;
use crate::task::Pid;

pub mod helpers; // TEAM_413: Syscall helper abstractions
pub mod mm;
pub mod process;
pub mod sys;
pub mod time;
pub mod types;

pub use helpers::{
    AsErrno, SyscallResultExt, id_arg, read_struct_from_user, write_struct_to_user,
};
pub use types::{Tms, Utsname};

/// TEAM_421: Internal syscall return type; `Err` carries a positive errno.
pub type SyscallResult = Result<i64, u32>;

/// Classic i386 system-call numbers handled by this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SyscallNumber {
    Time = 13,
    Break = 17,
    GetPid = 20,
    SetUid = 23,
    GetUid = 24,
    Stime = 25,
    Ptrace = 26,
    Stty = 31,
    Gtty = 32,
    Ftime = 35,
    Rename = 38,
    Times = 43,
    Prof = 44,
    Brk = 45,
    SetGid = 46,
    GetGid = 47,
    GetEuid = 49,
    GetEgid = 50,
    Acct = 51,
    Phys = 52,
    Lock = 53,
    Mpx = 56,
    SetPgid = 57,
    Ulimit = 58,
    Uname = 59,
    Umask = 60,
    GetPgrp = 65,
    SetSid = 66,
    SetReuid = 70,
    SetRegid = 71,
    TranslateAddress = 72,
}

impl SyscallNumber {
    pub fn from_u32(n: u32) -> Option<Self> {
        match n {
            13 => Some(Self::Time),
            17 => Some(Self::Break),
            20 => Some(Self::GetPid),
            23 => Some(Self::SetUid),
            24 => Some(Self::GetUid),
            25 => Some(Self::Stime),
            26 => Some(Self::Ptrace),
            31 => Some(Self::Stty),
            32 => Some(Self::Gtty),
            35 => Some(Self::Ftime),
            38 => Some(Self::Rename),
            43 => Some(Self::Times),
            44 => Some(Self::Prof),
            45 => Some(Self::Brk),
            46 => Some(Self::SetGid),
            47 => Some(Self::GetGid),
            49 => Some(Self::GetEuid),
            50 => Some(Self::GetEgid),
            51 => Some(Self::Acct),
            52 => Some(Self::Phys),
            53 => Some(Self::Lock),
            56 => Some(Self::Mpx),
            57 => Some(Self::SetPgid),
            58 => Some(Self::Ulimit),
            59 => Some(Self::Uname),
            60 => Some(Self::Umask),
            65 => Some(Self::GetPgrp),
            66 => Some(Self::SetSid),
            70 => Some(Self::SetReuid),
            71 => Some(Self::SetRegid),
            72 => Some(Self::TranslateAddress),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Break => "break",
            Self::GetPid => "getpid",
            Self::SetUid => "setuid",
            Self::GetUid => "getuid",
            Self::Stime => "stime",
            Self::Ptrace => "ptrace",
            Self::Stty => "stty",
            Self::Gtty => "gtty",
            Self::Ftime => "ftime",
            Self::Rename => "rename",
            Self::Times => "times",
            Self::Prof => "prof",
            Self::Brk => "brk",
            Self::SetGid => "setgid",
            Self::GetGid => "getgid",
            Self::GetEuid => "geteuid",
            Self::GetEgid => "getegid",
            Self::Acct => "acct",
            Self::Phys => "phys",
            Self::Lock => "lock",
            Self::Mpx => "mpx",
            Self::SetPgid => "setpgid",
            Self::Ulimit => "ulimit",
            Self::Uname => "uname",
            Self::Umask => "umask",
            Self::GetPgrp => "getpgrp",
            Self::SetSid => "setsid",
            Self::SetReuid => "setreuid",
            Self::SetRegid => "setregid",
            Self::TranslateAddress => "translate_address",
        }
    }
}

/// TEAM_431: Run system call `nr` on behalf of process `caller`.
///
/// # Arguments
/// * `kernel` - Kernel context (process table, clock, memory, config)
/// * `caller` - Pid of the process making the call
/// * `nr` - i386 system-call number
/// * `args` - Raw register arguments (ebx, ecx, edx)
/// * `user` - Access to the caller's address space
///
/// # Returns
/// The call's result, or a negative errno.
pub fn syscall_dispatch<M: PhysicalMemory>(
    kernel: &Kernel<M>,
    caller: Pid,
    nr: u32,
    args: [u32; 3],
    user: &mut dyn UserMemory,
) -> i64 {
    if !kernel.processes().contains(caller) {
        log::debug!("[SYSCALL] nr={} from unknown pid {}", nr, caller);
        return -i64::from(ESRCH);
    }

    let [a0, a1, _a2] = args;
    let result = match SyscallNumber::from_u32(nr) {
        Some(SyscallNumber::Time) => time::sys_time(kernel, user, a0),
        Some(SyscallNumber::Stime) => time::sys_stime(kernel, caller, user, a0),
        Some(SyscallNumber::Times) => time::sys_times(kernel, caller, user, a0),
        Some(SyscallNumber::GetPid) => process::sys_getpid(kernel, caller),
        Some(SyscallNumber::GetUid) => process::sys_getuid(kernel, caller),
        Some(SyscallNumber::GetEuid) => process::sys_geteuid(kernel, caller),
        Some(SyscallNumber::GetGid) => process::sys_getgid(kernel, caller),
        Some(SyscallNumber::GetEgid) => process::sys_getegid(kernel, caller),
        Some(SyscallNumber::SetUid) => process::sys_setuid(kernel, caller, a0 as i32),
        Some(SyscallNumber::SetGid) => process::sys_setgid(kernel, caller, a0 as i32),
        Some(SyscallNumber::SetReuid) => {
            process::sys_setreuid(kernel, caller, a0 as i32, a1 as i32)
        }
        Some(SyscallNumber::SetRegid) => {
            process::sys_setregid(kernel, caller, a0 as i32, a1 as i32)
        }
        Some(SyscallNumber::SetPgid) => process::sys_setpgid(kernel, caller, a0 as i32, a1 as i32),
        Some(SyscallNumber::GetPgrp) => process::sys_getpgrp(kernel, caller),
        Some(SyscallNumber::SetSid) => process::sys_setsid(kernel, caller),
        Some(SyscallNumber::Uname) => process::sys_uname(kernel, user, a0),
        Some(SyscallNumber::Umask) => process::sys_umask(kernel, caller, a0),
        Some(SyscallNumber::Brk) => mm::sys_brk(kernel, caller, a0),
        Some(SyscallNumber::TranslateAddress) => {
            mm::sys_translate_address(kernel, caller, a0, a1)
        }
        Some(
            n @ (SyscallNumber::Break
            | SyscallNumber::Ptrace
            | SyscallNumber::Stty
            | SyscallNumber::Gtty
            | SyscallNumber::Ftime
            | SyscallNumber::Rename
            | SyscallNumber::Prof
            | SyscallNumber::Acct
            | SyscallNumber::Phys
            | SyscallNumber::Lock
            | SyscallNumber::Mpx
            | SyscallNumber::Ulimit),
        ) => sys::sys_ni_syscall(n.name()),
        None => {
            log::warn!("[SYSCALL] Unknown syscall number: {}", nr);
            Err(ENOSYS)
        }
    };

    match result {
        Ok(value) => value,
        Err(errno) => -i64::from(errno),
    }
}
