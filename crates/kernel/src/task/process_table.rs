//! TEAM_431: Process table.
//!
//! Every live process control block lives in an index-stable arena; a pid
//! index maps pids to arena slots so lookups never scan the whole table.
//! Freed slots are reused, and a stale `SlotId` never resolves to the process
//! that took the slot over.

use pos_error::define_kernel_error;
use pos_utils::{Arena, HashMap, SlotId};

use linux_raw_sys::errno::{EAGAIN, EEXIST, EINVAL};

use super::{Pid, ProcessControlBlock};

define_kernel_error! {
    /// TEAM_431: Process table insertion failures.
    pub enum TableError(0x12) {
        DuplicatePid = 0x01 => "Pid already registered"; EEXIST,
        TableFull = 0x02 => "Process table full"; EAGAIN,
        InvalidPid = 0x03 => "Pid 0 cannot be registered"; EINVAL,
    }
}

pub struct ProcessTable {
    slots: Arena<ProcessControlBlock>,
    by_pid: HashMap<Pid, SlotId>,
    capacity: usize,
}

impl ProcessTable {
    /// Empty table holding at most `capacity` processes.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Arena::with_capacity(capacity),
            by_pid: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// TEAM_431: Register a process.
    ///
    /// # Returns
    /// * `Ok(slot)` - The arena slot now holding the process
    /// * `Err(InvalidPid)` - pid 0 is reserved
    /// * `Err(DuplicatePid)` - A live process already has this pid
    /// * `Err(TableFull)` - `capacity` processes are already live
    pub fn insert(&mut self, pcb: ProcessControlBlock) -> Result<SlotId, TableError> {
        if pcb.pid == 0 {
            return Err(TableError::InvalidPid);
        }
        if self.by_pid.contains_key(&pcb.pid) {
            return Err(TableError::DuplicatePid);
        }
        if self.slots.len() >= self.capacity {
            return Err(TableError::TableFull);
        }
        let pid = pcb.pid;
        let slot = self.slots.insert(pcb);
        self.by_pid.insert(pid, slot);
        log::trace!("[PROC] insert pid={} slot={}", pid, slot.index());
        Ok(slot)
    }

    /// Remove a process, handing its control block back to the caller.
    pub fn remove(&mut self, pid: Pid) -> Option<ProcessControlBlock> {
        let slot = self.by_pid.remove(&pid)?;
        let pcb = self.slots.remove(slot);
        log::trace!("[PROC] remove pid={} slot={}", pid, slot.index());
        pcb
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.by_pid.contains_key(&pid)
    }

    pub fn find_by_pid(&self, pid: Pid) -> Option<&ProcessControlBlock> {
        let slot = *self.by_pid.get(&pid)?;
        self.slots.get(slot)
    }

    pub fn find_by_pid_mut(&mut self, pid: Pid) -> Option<&mut ProcessControlBlock> {
        let slot = *self.by_pid.get(&pid)?;
        self.slots.get_mut(slot)
    }

    /// Process held in `slot`, if the slot has not been freed since.
    pub fn get(&self, slot: SlotId) -> Option<&ProcessControlBlock> {
        self.slots.get(slot)
    }

    /// Live processes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &ProcessControlBlock> {
        self.slots.iter().map(|(_, pcb)| pcb)
    }

    /// Members of process group `pgrp`.
    pub fn group_members(&self, pgrp: Pid) -> impl Iterator<Item = &ProcessControlBlock> {
        self.iter().filter(move |pcb| pcb.pgrp == pgrp)
    }

    /// The process that founded `session`, if it is still alive.
    pub fn session_leader(&self, session: Pid) -> Option<&ProcessControlBlock> {
        self.iter().find(|pcb| pcb.leader && pcb.session == session)
    }
}
