//! TEAM_431: Process control blocks and the state the credential manager and
//! address translator read from them.
//!
//! Behavior IDs [C1]-[C6] (credentials) and [G1]-[G6] (groups/sessions) are
//! referenced from the unit tests of the submodules.

pub mod credentials;
pub mod process_table;
pub mod session;

pub use credentials::Credentials;
pub use process_table::{ProcessTable, TableError};

use pos_error::define_kernel_error;
use pos_hal::LocalDescriptorTable;
use pos_hal::descriptor::default_ldt;

use linux_raw_sys::errno::{EPERM, ESRCH};

/// Process ID type alias
pub type Pid = u32;
/// User identity
pub type Uid = u32;
/// Group identity
pub type Gid = u32;

/// The distinguished superuser identity.
pub const ROOT_UID: Uid = 0;

/// Default file-creation mask of a freshly created process.
pub const DEFAULT_UMASK: u16 = 0o022;

/// Minor number of a terminal device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TtyId(pub u16);

define_kernel_error! {
    /// TEAM_431: Failures of the credential and session operations.
    pub enum ProcError(0x10) {
        /// A privilege rule rejected the request
        PermissionDenied = 0x01 => "Operation not permitted"; EPERM,
        /// No process with the requested pid
        NoSuchProcess = 0x02 => "No such process"; ESRCH,
    }
}

/// Program layout bounds that the break may move within.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryLayout {
    /// End of the code segment (lowest legal break).
    pub end_code: u32,
    /// Current program break.
    pub brk: u32,
    /// Lowest address of the user stack.
    pub start_stack: u32,
}

impl MemoryLayout {
    /// Move the break to `requested` if it stays within
    /// `end_code ..< start_stack - guard`. Returns the break in effect afterwards.
    pub fn adjust_brk(&mut self, requested: u32, guard: u32) -> u32 {
        let ceiling = self.start_stack.saturating_sub(guard);
        if requested >= self.end_code && requested < ceiling {
            self.brk = requested;
        }
        self.brk
    }
}

/// CPU time accounting, in clock ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub utime: u32,
    pub stime: u32,
    pub cutime: u32,
    pub cstime: u32,
}

/// TEAM_431: Per-process state consulted by the system-call layer.
///
/// Spawn and teardown belong to the rest of the kernel; this layer only mutates
/// identity, group/session membership, the break and the umask in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessControlBlock {
    /// Unique and immutable once the process is registered.
    pub pid: Pid,
    pub creds: Credentials,
    pub pgrp: Pid,
    pub session: Pid,
    /// True iff this process founded its session.
    pub leader: bool,
    pub tty: Option<TtyId>,
    pub umask: u16,
    /// Null, code and data descriptors; see [`pos_hal::LDT_DATA`].
    pub ldt: LocalDescriptorTable,
    /// Physical address of the page directory.
    pub page_directory: u32,
    pub layout: MemoryLayout,
    pub times: CpuTimes,
}

impl ProcessControlBlock {
    /// A process in its own group, inside session `pid`, not a leader.
    pub fn new(pid: Pid, creds: Credentials) -> Self {
        Self {
            pid,
            creds,
            pgrp: pid,
            session: pid,
            leader: false,
            tty: None,
            umask: DEFAULT_UMASK,
            ldt: default_ldt(),
            page_directory: 0,
            layout: MemoryLayout::default(),
            times: CpuTimes::default(),
        }
    }

    /// Place the process in `session`/`pgrp`.
    #[must_use]
    pub fn in_session(mut self, session: Pid, pgrp: Pid) -> Self {
        self.session = session;
        self.pgrp = pgrp;
        self.leader = false;
        self
    }

    /// Make the process the founder of its own session.
    #[must_use]
    pub fn as_session_leader(mut self) -> Self {
        self.session = self.pid;
        self.pgrp = self.pid;
        self.leader = true;
        self
    }

    #[must_use]
    pub fn with_tty(mut self, tty: TtyId) -> Self {
        self.tty = Some(tty);
        self
    }

    #[must_use]
    pub fn with_ldt(mut self, ldt: LocalDescriptorTable) -> Self {
        self.ldt = ldt;
        self
    }

    #[must_use]
    pub fn with_page_directory(mut self, pa: u32) -> Self {
        self.page_directory = pa;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: MemoryLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Privilege predicate used by every "or superuser" rule.
    pub fn is_superuser(&self) -> bool {
        self.creds.is_superuser()
    }
}
