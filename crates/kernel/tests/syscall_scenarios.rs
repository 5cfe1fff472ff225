//! TEAM_431: End-to-end system-call scenarios through `syscall_dispatch`.
//!
//! Each test builds a kernel over an in-memory page-table store, registers a
//! handful of processes and drives the dispatcher with raw register values,
//! checking the ABI word that would land in eax.

use linux_raw_sys::errno::{EFAULT, EINVAL, ENOSYS, EPERM, ESRCH};
use pallas_kernel::task::MemoryLayout;
use pallas_kernel::{
    Credentials, Kernel, KernelConfig, Pid, ProcError, ProcessControlBlock, SyscallNumber,
    TranslateConfig, UserMemory, UserWindow, syscall_dispatch,
};
use pos_hal::descriptor::ldt_with_base;
use pos_hal::{FrameMap, FrameRange, LDT_DATA, PageTableFlags};

const DIR_PA: u32 = 0x0000_0000;
const USER_BASE: u32 = 0x0000_2000;

struct Harness {
    kernel: Kernel<FrameMap>,
    user: UserWindow,
}

impl Harness {
    fn new(config: KernelConfig, memory: FrameMap) -> Self {
        Self {
            kernel: Kernel::new(config, memory),
            user: UserWindow::new(USER_BASE, 256),
        }
    }

    fn with_processes(pcbs: Vec<ProcessControlBlock>) -> Self {
        let h = Self::new(KernelConfig::new(), FrameMap::new(16 * 1024 * 1024));
        for pcb in pcbs {
            h.kernel.register_process(pcb).unwrap();
        }
        h
    }

    fn call(&mut self, caller: Pid, nr: SyscallNumber, args: [u32; 3]) -> i64 {
        syscall_dispatch(&self.kernel, caller, nr as u32, args, &mut self.user)
    }

    fn pcb(&self, pid: Pid) -> ProcessControlBlock {
        self.kernel.processes().find_by_pid(pid).cloned().unwrap()
    }
}

fn neg(errno: u32) -> i64 {
    -i64::from(errno)
}

fn raw(v: i32) -> u32 {
    v as u32
}

fn user(pid: Pid, uid: u32) -> ProcessControlBlock {
    ProcessControlBlock::new(pid, Credentials::user(uid, 100))
}

// ============================================================================
// Credentials
// ============================================================================

#[test]
fn unprivileged_setreuid_to_root_is_refused() {
    // Raw 0 means "unchanged" at the boundary, so the typed call carries root.
    let mut creds = Credentials::user(500, 100);
    assert_eq!(
        creds.set_real_and_effective_uid(Some(0), Some(0)),
        Err(ProcError::PermissionDenied)
    );
    assert_eq!(creds.uid, 500);

    // Through the dispatcher: uid 500 cannot take another user's ids.
    let mut h = Harness::with_processes(vec![user(4, 500)]);
    assert_eq!(h.call(4, SyscallNumber::SetReuid, [1, 1, 0]), neg(EPERM));
    assert_eq!(h.call(4, SyscallNumber::GetUid, [0; 3]), 500);
    assert_eq!(h.call(4, SyscallNumber::GetEuid, [0; 3]), 500);
}

#[test]
fn setreuid_with_refused_effective_restores_real() {
    let mut creds = Credentials::user(500, 100);
    creds.euid = 600;
    let mut h = Harness::with_processes(vec![ProcessControlBlock::new(4, creds)]);
    assert_eq!(h.call(4, SyscallNumber::SetReuid, [600, 700, 0]), neg(EPERM));
    assert_eq!(h.pcb(4).creds.uid, 500);
    assert_eq!(h.pcb(4).creds.euid, 600);
}

#[test]
fn setuid_to_current_effective_always_succeeds() {
    let mut h = Harness::with_processes(vec![user(4, 500)]);
    assert_eq!(h.call(4, SyscallNumber::SetUid, [500, 0, 0]), 0);
    assert_eq!(h.call(4, SyscallNumber::GetEuid, [0; 3]), 500);
}

#[test]
fn negative_ids_leave_credentials_alone() {
    let mut h = Harness::with_processes(vec![user(4, 500)]);
    assert_eq!(
        h.call(4, SyscallNumber::SetRegid, [raw(-1), raw(-1), 0]),
        0
    );
    assert_eq!(h.call(4, SyscallNumber::SetReuid, [raw(-1), 0, 0]), 0);
    assert_eq!(h.pcb(4).creds, Credentials::user(500, 100));
}

#[test]
fn root_setgid_changes_both_group_ids() {
    let mut h = Harness::with_processes(vec![ProcessControlBlock::new(1, Credentials::root())]);
    assert_eq!(h.call(1, SyscallNumber::SetGid, [42, 0, 0]), 0);
    assert_eq!(h.call(1, SyscallNumber::GetGid, [0; 3]), 42);
    assert_eq!(h.call(1, SyscallNumber::GetEgid, [0; 3]), 42);
    assert_eq!(h.pcb(1).creds.sgid, 0);
}

// ============================================================================
// Process groups and sessions
// ============================================================================

#[test]
fn privileged_session_leader_cannot_change_group() {
    let leader = ProcessControlBlock::new(10, Credentials::root()).as_session_leader();
    let mut h = Harness::with_processes(vec![leader]);
    assert_eq!(h.call(10, SyscallNumber::SetPgid, [10, 5, 0]), neg(EPERM));
    assert_eq!(h.call(10, SyscallNumber::GetPgrp, [0; 3]), 10);
}

#[test]
fn negative_group_id_is_refused_as_permission_error() {
    let leader = ProcessControlBlock::new(10, Credentials::root()).as_session_leader();
    let member = ProcessControlBlock::new(11, Credentials::user(500, 100)).in_session(10, 10);
    let mut h = Harness::with_processes(vec![leader, member]);
    assert_eq!(h.call(10, SyscallNumber::SetPgid, [10, raw(-4), 0]), neg(EPERM));
    assert_eq!(h.call(11, SyscallNumber::SetPgid, [0, raw(-4), 0]), neg(EPERM));
    assert_eq!(h.call(11, SyscallNumber::SetPgid, [99, raw(-4), 0]), neg(ESRCH));
    assert_eq!(h.call(11, SyscallNumber::GetPgrp, [0; 3]), 10);
}

#[test]
fn setpgid_on_any_leader_fails_for_any_group() {
    let mut h = Harness::with_processes(vec![
        user(10, 500).as_session_leader(),
        user(11, 500).in_session(10, 10),
    ]);
    for pgrp in [0, 1, 10, 11, 1000] {
        assert_eq!(h.call(11, SyscallNumber::SetPgid, [10, pgrp, 0]), neg(EPERM));
    }
}

#[test]
fn setpgid_within_session_then_across() {
    let mut h = Harness::with_processes(vec![
        user(10, 500).as_session_leader(),
        user(11, 500).in_session(10, 10),
        user(12, 500).in_session(10, 10),
        user(20, 501).as_session_leader(),
        user(21, 501).in_session(20, 20),
    ]);
    // 11 starts its own group and pulls 12 into it.
    assert_eq!(h.call(11, SyscallNumber::SetPgid, [0, 0, 0]), 0);
    assert_eq!(h.call(11, SyscallNumber::SetPgid, [12, 11, 0]), 0);
    assert_eq!(h.call(12, SyscallNumber::GetPgrp, [0; 3]), 11);
    assert_eq!(h.pcb(12).session, 10);

    // 21 lives in another session.
    assert_eq!(h.call(11, SyscallNumber::SetPgid, [21, 11, 0]), neg(EPERM));
    assert_eq!(h.call(11, SyscallNumber::SetPgid, [99, 0, 0]), neg(ESRCH));
}

#[test]
fn setsid_twice_from_unprivileged_process() {
    let mut h = Harness::with_processes(vec![
        user(10, 500).as_session_leader(),
        user(11, 500)
            .in_session(10, 10)
            .with_tty(pallas_kernel::task::TtyId(1)),
    ]);
    assert_eq!(h.call(11, SyscallNumber::SetSid, [0; 3]), 11);
    let pcb = h.pcb(11);
    assert!(pcb.leader);
    assert_eq!((pcb.session, pcb.pgrp, pcb.tty), (11, 11, None));

    assert_eq!(h.call(11, SyscallNumber::SetSid, [0; 3]), neg(EPERM));

    // Exactly one leader per session afterwards.
    let table = h.kernel.processes();
    for session in [10, 11] {
        let leaders = table
            .iter()
            .filter(|p| p.leader && p.session == session)
            .count();
        assert_eq!(leaders, 1);
    }
}

// ============================================================================
// Address translation
// ============================================================================

fn translating_harness(check_installed_memory: bool) -> Harness {
    let mut mem = FrameMap::new(16 * 1024 * 1024);
    mem.install_directory(DIR_PA).unwrap();
    let mut frames = FrameRange::new(0x0010_0000, 0x0020_0000);
    mem.map_page(
        DIR_PA,
        0x0080_1000,
        0x0020_0000,
        PageTableFlags::USER_DATA,
        &mut frames,
    )
    .unwrap();

    let mut config = KernelConfig::new();
    config.translate = TranslateConfig {
        check_installed_memory,
    };
    let h = Harness::new(config, mem);
    h.kernel
        .register_process(
            user(4, 500)
                .with_ldt(ldt_with_base(0x0080_0000, 0x0400_0000))
                .with_page_directory(DIR_PA),
        )
        .unwrap();
    h
}

#[test]
fn translate_segment_base_plus_offset() {
    let mut h = translating_harness(true);
    assert_eq!(
        h.call(4, SyscallNumber::TranslateAddress, [LDT_DATA as u32, 0x1234, 0]),
        0x0020_0234
    );
}

#[test]
fn translate_missing_directory_entry_is_minus_one() {
    let mut h = translating_harness(false);
    // Directory slot 3 (0x00c0_0000..) is empty whatever the low bits are.
    for low in [0x000, 0x001, 0x234, 0xfff] {
        assert_eq!(
            h.call(
                4,
                SyscallNumber::TranslateAddress,
                [LDT_DATA as u32, 0x0040_0000 + low, 0]
            ),
            -1
        );
    }
}

#[test]
fn translate_out_of_range_segment_is_minus_one() {
    let mut h = translating_harness(true);
    assert_eq!(h.call(4, SyscallNumber::TranslateAddress, [3, 0x1234, 0]), -1);
}

// ============================================================================
// Supplemented calls
// ============================================================================

#[test]
fn time_and_stime() {
    let mut h = Harness::with_processes(vec![
        ProcessControlBlock::new(1, Credentials::root()),
        user(4, 500),
    ]);
    h.kernel.clock().set_current_time(1_000_000);
    for _ in 0..350 {
        h.kernel.clock().tick();
    }
    assert_eq!(h.call(4, SyscallNumber::Time, [0; 3]), 1_000_003);
    assert_eq!(h.call(4, SyscallNumber::Time, [USER_BASE, 0, 0]), 1_000_003);
    assert_eq!(
        h.user.slice(USER_BASE, 4),
        Some(&1_000_003i32.to_le_bytes()[..])
    );
    assert_eq!(h.call(4, SyscallNumber::Time, [0x10, 0, 0]), neg(EFAULT));

    h.user
        .write_bytes(USER_BASE + 8, &2_000_000i32.to_le_bytes())
        .unwrap();
    assert_eq!(h.call(4, SyscallNumber::Stime, [USER_BASE + 8, 0, 0]), neg(EPERM));
    assert_eq!(h.call(1, SyscallNumber::Stime, [USER_BASE + 8, 0, 0]), 0);
    assert_eq!(h.call(1, SyscallNumber::Time, [0; 3]), 2_000_000);
}

#[test]
fn times_copies_accounting() {
    let mut pcb = user(4, 500);
    pcb.times.utime = 7;
    pcb.times.cstime = 9;
    let mut h = Harness::with_processes(vec![pcb]);
    h.kernel.clock().tick();
    h.kernel.clock().tick();
    assert_eq!(h.call(4, SyscallNumber::Times, [0; 3]), 2);
    assert_eq!(h.call(4, SyscallNumber::Times, [USER_BASE, 0, 0]), 2);
    let bytes = h.user.slice(USER_BASE, 16).unwrap();
    assert_eq!(&bytes[0..4], &7u32.to_le_bytes());
    assert_eq!(&bytes[12..16], &9u32.to_le_bytes());
}

#[test]
fn brk_umask_uname() {
    let pcb = user(4, 500).with_layout(MemoryLayout {
        end_code: 0x1000,
        brk: 0x2000,
        start_stack: 0x0010_0000,
    });
    let mut h = Harness::with_processes(vec![pcb]);
    assert_eq!(h.call(4, SyscallNumber::Brk, [0x8000, 0, 0]), 0x8000);
    assert_eq!(h.call(4, SyscallNumber::Brk, [0x0010_0000, 0, 0]), 0x8000);

    assert_eq!(h.call(4, SyscallNumber::Umask, [0o027, 0, 0]), 0o022);
    assert_eq!(h.pcb(4).umask, 0o027);

    assert_eq!(h.call(4, SyscallNumber::Uname, [0, 0, 0]), neg(EINVAL));
    assert_eq!(h.call(4, SyscallNumber::Uname, [USER_BASE, 0, 0]), 0);
    assert_eq!(h.user.slice(USER_BASE, 7), Some(&b"pallas\0"[..]));
}

#[test]
fn legacy_and_unknown_numbers() {
    let mut h = Harness::with_processes(vec![user(4, 500)]);
    for nr in [
        SyscallNumber::Ftime,
        SyscallNumber::Break,
        SyscallNumber::Ptrace,
        SyscallNumber::Ulimit,
    ] {
        assert_eq!(h.call(4, nr, [0; 3]), neg(ENOSYS));
    }
    assert_eq!(
        syscall_dispatch(&h.kernel, 4, 250, [0; 3], &mut h.user),
        neg(ENOSYS)
    );
}

#[test]
fn unknown_caller_gets_esrch() {
    let mut h = Harness::with_processes(vec![user(4, 500)]);
    assert_eq!(h.call(5, SyscallNumber::GetPid, [0; 3]), neg(ESRCH));
    assert_eq!(h.call(4, SyscallNumber::GetPid, [0; 3]), 4);
}
