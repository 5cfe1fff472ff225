// TEAM_431: Wall clock and CPU-time syscalls.
// Wall time is derived, never stored: startup_time + jiffies / hz. Setting the
// clock moves startup_time so the derivation yields the requested second.

use core::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use linux_raw_sys::errno::EPERM;
use pos_hal::PhysicalMemory;

use crate::kernel::Kernel;
use crate::memory::UserMemory;
use crate::syscall::{AsErrno, SyscallResult, Tms, read_struct_from_user, write_struct_to_user};
use crate::task::Pid;

/// Boot-relative tick counter plus the wall time the counter started at.
pub struct SystemClock {
    startup_time: AtomicI64,
    jiffies: AtomicU64,
    hz: u64,
}

impl SystemClock {
    pub const fn new(hz: u64) -> Self {
        Self {
            startup_time: AtomicI64::new(0),
            jiffies: AtomicU64::new(0),
            hz,
        }
    }

    /// Advance by one timer tick. Called by the timer interrupt owner.
    pub fn tick(&self) {
        self.jiffies.fetch_add(1, Ordering::Relaxed);
    }

    pub fn jiffies(&self) -> u64 {
        self.jiffies.load(Ordering::Relaxed)
    }

    pub fn startup_time(&self) -> i64 {
        self.startup_time.load(Ordering::Relaxed)
    }

    /// Whole seconds since boot.
    pub fn uptime(&self) -> i64 {
        (self.jiffies() / self.hz.max(1)) as i64
    }

    /// Seconds since the epoch.
    pub fn current_time(&self) -> i64 {
        self.startup_time().wrapping_add(self.uptime())
    }

    /// Make `current_time()` report `seconds`.
    pub fn set_current_time(&self, seconds: i64) {
        self.startup_time
            .store(seconds.wrapping_sub(self.uptime()), Ordering::Relaxed);
    }
}

/// TEAM_431: sys_time - Seconds since the epoch, also stored at `tloc` if non-null.
pub fn sys_time<M: PhysicalMemory>(
    kernel: &Kernel<M>,
    user: &mut dyn UserMemory,
    tloc: u32,
) -> SyscallResult {
    let now = kernel.clock().current_time();
    if tloc != 0 {
        // time_t is 32 bits on this ABI.
        write_struct_to_user(user, tloc, &(now as i32)).map_err(|e| e.as_errno())?;
    }
    log::trace!("[SYSCALL] time(0x{:x}) -> {}", tloc, now);
    Ok(now)
}

/// TEAM_431: sys_stime - Set the wall clock from the seconds value at `tptr`.
///
/// Superuser only.
pub fn sys_stime<M: PhysicalMemory>(
    kernel: &Kernel<M>,
    caller: Pid,
    user: &mut dyn UserMemory,
    tptr: u32,
) -> SyscallResult {
    let privileged = kernel
        .with_process(caller, |p| p.is_superuser())
        .map_err(|e| e.as_errno())?;
    if !privileged {
        log::debug!("[SYSCALL] stime: pid {} is not superuser", caller);
        return Err(EPERM);
    }
    let seconds: i32 = read_struct_from_user(user, tptr).map_err(|e| e.as_errno())?;
    kernel.clock().set_current_time(i64::from(seconds));
    log::trace!("[SYSCALL] stime({}) -> 0", seconds);
    Ok(0)
}

/// TEAM_431: sys_times - Copy the caller's CPU times to `buf` (if non-null).
///
/// # Returns
/// Ticks since boot.
pub fn sys_times<M: PhysicalMemory>(
    kernel: &Kernel<M>,
    caller: Pid,
    user: &mut dyn UserMemory,
    buf: u32,
) -> SyscallResult {
    let times = kernel
        .with_process(caller, |p| p.times)
        .map_err(|e| e.as_errno())?;
    if buf != 0 {
        let tms = Tms {
            tms_utime: times.utime,
            tms_stime: times.stime,
            tms_cutime: times.cutime,
            tms_cstime: times.cstime,
        };
        write_struct_to_user(user, buf, &tms).map_err(|e| e.as_errno())?;
    }
    let jiffies = kernel.clock().jiffies() as i64;
    log::trace!("[SYSCALL] times(0x{:x}) -> {}", buf, jiffies);
    Ok(jiffies)
}
