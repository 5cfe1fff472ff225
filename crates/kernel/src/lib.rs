//! TEAM_431: System-call core of a small i386 kernel.
//!
//! - `task` - process control blocks, the process table, credentials and sessions
//! - `memory` - segment + page address translation, user-memory copies
//! - `syscall` - the handlers and the dispatcher
//! - `kernel` - the context every handler runs against
//! - `config` / `logger` - ambient configuration and log output

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod config;
pub mod kernel;
pub mod logger;
pub mod memory;
pub mod syscall;
pub mod task;

pub use config::{KernelConfig, TranslateConfig, UtsInfo};
pub use kernel::Kernel;
pub use memory::{TranslationFault, UserMemory, UserWindow, translate};
pub use syscall::{SyscallNumber, SyscallResult, syscall_dispatch};
pub use task::{
    Credentials, Gid, Pid, ProcError, ProcessControlBlock, ProcessTable, TableError, Uid,
};
