//! TEAM_431: Kernel context handed to every system call.
//!
//! Holds the process table, the clock, the configuration and the view of
//! physical memory. There is no ambient "current process": the dispatcher is
//! told which pid is calling.

use pos_hal::PhysicalMemory;
use pos_utils::{Mutex, MutexGuard, SlotId};

use crate::config::KernelConfig;
use crate::logger;
use crate::syscall::time::SystemClock;
use crate::task::{Pid, ProcError, ProcessControlBlock, ProcessTable, TableError};

pub struct Kernel<M> {
    config: KernelConfig,
    processes: Mutex<ProcessTable>,
    clock: SystemClock,
    memory: M,
}

impl<M: PhysicalMemory> Kernel<M> {
    pub fn new(config: KernelConfig, memory: M) -> Self {
        Self {
            processes: Mutex::new(ProcessTable::new(config.max_processes)),
            clock: SystemClock::new(config.hz),
            config,
            memory,
        }
    }

    /// TEAM_431: Bring the kernel context up.
    ///
    /// Installs the console logger at `config.log_level` (Trace under
    /// `verbose-syscalls`), then builds the context. If a logger is already
    /// installed it is kept; the level is applied either way.
    pub fn boot(config: KernelConfig, memory: M) -> Self {
        if logger::init(config.log_level).is_err() {
            log::debug!("[BOOT] logger already installed");
        }
        log::info!(
            "[BOOT] {} {} ({}), {} process slots, {} Hz",
            config.uts.sysname,
            config.uts.release,
            config.uts.machine,
            config.max_processes,
            config.hz
        );
        Self::new(config, memory)
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn clock(&self) -> &SystemClock {
        &self.clock
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Lock the process table.
    pub fn processes(&self) -> MutexGuard<'_, ProcessTable> {
        self.processes.lock()
    }

    /// TEAM_431: Register a process created elsewhere in the kernel.
    pub fn register_process(&self, pcb: ProcessControlBlock) -> Result<SlotId, TableError> {
        self.processes().insert(pcb)
    }

    pub fn unregister_process(&self, pid: Pid) -> Option<ProcessControlBlock> {
        self.processes().remove(pid)
    }

    /// Run `f` on process `pid` with the table locked.
    pub fn with_process<R>(
        &self,
        pid: Pid,
        f: impl FnOnce(&mut ProcessControlBlock) -> R,
    ) -> Result<R, ProcError> {
        let mut table = self.processes();
        let pcb = table.find_by_pid_mut(pid).ok_or(ProcError::NoSuchProcess)?;
        Ok(f(pcb))
    }
}
