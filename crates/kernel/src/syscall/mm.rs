//! TEAM_228: Memory management syscalls.
//! TEAM_431: Program break and the diagnostic address translation call.

use linux_raw_sys::errno::ESRCH;
use pos_hal::PhysicalMemory;

use crate::kernel::Kernel;
use crate::memory::translate;
use crate::syscall::{SyscallResult, SyscallResultExt};
use crate::task::Pid;

/// TEAM_431: sys_brk - Move the program break.
///
/// The request is honored only if it stays within
/// `end_code ..< start_stack - stack_guard`.
///
/// # Returns
/// The break in effect after the call, whether or not it moved.
pub fn sys_brk<M: PhysicalMemory>(kernel: &Kernel<M>, caller: Pid, end_data_seg: u32) -> SyscallResult {
    let guard = kernel.config().stack_guard;
    let brk = kernel
        .with_process(caller, |p| p.layout.adjust_brk(end_data_seg, guard))
        .to_syscall_result(i64::from)?;
    log::trace!("[SYSCALL] brk(0x{:x}) -> 0x{:x}", end_data_seg, brk);
    Ok(brk)
}

/// TEAM_431: sys_translate_address - Physical address the caller would reach at
/// `offset` in descriptor `segment_index`.
///
/// Diagnostic only. Any translation fault is reported as -1.
pub fn sys_translate_address<M: PhysicalMemory>(
    kernel: &Kernel<M>,
    caller: Pid,
    segment_index: u32,
    offset: u32,
) -> SyscallResult {
    let cfg = kernel.config().translate;
    let table = kernel.processes();
    let pcb = table.find_by_pid(caller).ok_or(ESRCH)?;
    let phys = match translate(pcb, kernel.memory(), segment_index as usize, offset, &cfg) {
        Ok(phys) => i64::from(phys),
        Err(fault) => {
            log::debug!(
                "[SYSCALL] translate_address({}, 0x{:x}): {}",
                segment_index,
                offset,
                fault
            );
            -1
        }
    };
    log::trace!(
        "[SYSCALL] translate_address({}, 0x{:x}) -> {}",
        segment_index,
        offset,
        phys
    );
    Ok(phys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KernelConfig;
    use crate::task::{Credentials, MemoryLayout, ProcessControlBlock};
    use pos_hal::descriptor::ldt_with_base;
    use pos_hal::{FrameMap, FrameRange, LDT_DATA, PageTableFlags};

    fn kernel() -> Kernel<FrameMap> {
        let mut mem = FrameMap::new(0x0100_0000);
        mem.install_directory(0).unwrap();
        let mut frames = FrameRange::new(0x0010_0000, 0x0020_0000);
        mem.map_page(0, 0x0400_3000, 0x0030_0000, PageTableFlags::USER_DATA, &mut frames)
            .unwrap();

        let kernel = Kernel::new(KernelConfig::new(), mem);
        let pcb = ProcessControlBlock::new(3, Credentials::user(500, 100))
            .with_ldt(ldt_with_base(0x0400_0000, 0x0400_0000))
            .with_layout(MemoryLayout {
                end_code: 0x0000_8000,
                brk: 0x0001_0000,
                start_stack: 0x0100_0000,
            });
        kernel.register_process(pcb).unwrap();
        kernel
    }

    #[test]
    fn test_brk_accepts_and_rejects() {
        let k = kernel();
        assert_eq!(sys_brk(&k, 3, 0x0002_0000), Ok(0x0002_0000));
        assert_eq!(sys_brk(&k, 3, 0x0000_4000), Ok(0x0002_0000));
        assert_eq!(sys_brk(&k, 3, 0x0100_0000 - 0x1000), Ok(0x0002_0000));
        assert_eq!(sys_brk(&k, 3, 0), Ok(0x0002_0000));
        assert_eq!(sys_brk(&k, 9, 0), Err(ESRCH));
    }

    #[test]
    fn test_translate_address_reports_faults_as_minus_one() {
        let k = kernel();
        assert_eq!(
            sys_translate_address(&k, 3, LDT_DATA as u32, 0x3abc),
            Ok(0x0030_0abc)
        );
        assert_eq!(sys_translate_address(&k, 3, LDT_DATA as u32, 0x5000), Ok(-1));
        assert_eq!(sys_translate_address(&k, 3, 7, 0), Ok(-1));
        assert_eq!(sys_translate_address(&k, 8, 2, 0), Err(ESRCH));
    }
}
