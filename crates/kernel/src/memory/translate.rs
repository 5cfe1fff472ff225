//! TEAM_431: Segment + page translation of a process-relative address.
//!
//! `segment base + offset` gives the linear address (wrapping, as the
//! hardware does), which is then walked through the process's page directory.
//! Nothing here writes to the descriptor table or the paging structures.

use pos_error::define_kernel_error;
use pos_hal::{
    LocalDescriptorTable, PhysicalMemory, WalkError, directory_index_of, page_offset_of,
    segment_base_of, table_index_of, walk,
};

use crate::config::TranslateConfig;
use crate::task::ProcessControlBlock;

define_kernel_error! {
    /// TEAM_431: Reasons a process-relative address has no physical address.
    pub enum TranslationFault(0x11) {
        PageDirectoryMiss = 0x01 => "Page directory entry not present",
        PageTableMiss = 0x02 => "Page table entry not present",
        SegmentOutOfRange = 0x03 => "Segment index outside descriptor table",
        OutsideInstalledMemory = 0x04 => "Physical address beyond installed memory",
        TableUnreachable = 0x05 => "Page table frame not accessible",
    }
}

impl From<WalkError> for TranslationFault {
    fn from(e: WalkError) -> Self {
        match e {
            WalkError::DirectoryNotPresent => Self::PageDirectoryMiss,
            WalkError::TableNotPresent => Self::PageTableMiss,
            WalkError::TableUnreachable => Self::TableUnreachable,
        }
    }
}

/// Linear address of `offset` within descriptor `segment_index` of `ldt`.
pub fn linear_address_of(
    ldt: &LocalDescriptorTable,
    segment_index: usize,
    offset: u32,
) -> Result<u32, TranslationFault> {
    let desc = ldt
        .get(segment_index)
        .ok_or(TranslationFault::SegmentOutOfRange)?;
    Ok(segment_base_of(desc).wrapping_add(offset))
}

/// TEAM_431: Resolve `offset` in segment `segment_index` of `pcb` to a physical address.
///
/// # Arguments
/// * `pcb` - Process whose descriptor table and page directory are used
/// * `mem` - Where the page directory and page tables are read from
/// * `segment_index` - Descriptor table slot holding the segment base
/// * `offset` - Offset within the segment
/// * `cfg` - Whether to bound the result by installed memory
pub fn translate<M>(
    pcb: &ProcessControlBlock,
    mem: &M,
    segment_index: usize,
    offset: u32,
    cfg: &TranslateConfig,
) -> Result<u32, TranslationFault>
where
    M: PhysicalMemory + ?Sized,
{
    let linear = linear_address_of(&pcb.ldt, segment_index, offset)?;

    let directory = mem
        .page_table(pcb.page_directory)
        .ok_or(TranslationFault::TableUnreachable)?;

    let result = walk(mem, directory, linear);
    if let Some(desc) = pcb.ldt.get(segment_index) {
        log::debug!(
            "[XLATE] pid={} desc={:08x}:{:08x} la={:08x} dir={} tbl={} off={:03x} -> {:?}",
            pcb.pid,
            desc.b,
            desc.a,
            linear,
            directory_index_of(linear),
            table_index_of(linear),
            page_offset_of(linear),
            result.map(|t| t.phys)
        );
    }
    let phys = result?.phys;

    if cfg.check_installed_memory && !mem.contains(phys) {
        return Err(TranslationFault::OutsideInstalledMemory);
    }
    Ok(phys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Credentials;
    use pos_hal::descriptor::ldt_with_base;
    use pos_hal::{FrameMap, FrameRange, LDT_CODE, LDT_DATA, PageTableFlags};

    const DIR_PA: u32 = 0;
    const BASE: u32 = 0x0080_0000;

    fn strict() -> TranslateConfig {
        TranslateConfig {
            check_installed_memory: true,
        }
    }

    fn lax() -> TranslateConfig {
        TranslateConfig {
            check_installed_memory: false,
        }
    }

    fn process() -> ProcessControlBlock {
        ProcessControlBlock::new(4, Credentials::user(500, 100))
            .with_ldt(ldt_with_base(BASE, 0x0400_0000))
            .with_page_directory(DIR_PA)
    }

    fn memory() -> FrameMap {
        let mut mem = FrameMap::new(16 * 1024 * 1024);
        mem.install_directory(DIR_PA).unwrap();
        mem
    }

    fn map(mem: &mut FrameMap, linear: u32, frame: u32) {
        let mut frames = FrameRange::new(0x0010_0000, 0x0020_0000);
        mem.map_page(DIR_PA, linear, frame, PageTableFlags::USER_DATA, &mut frames)
            .unwrap();
    }

    #[test]
    fn test_translate_composes_frame_and_offset() {
        let mut mem = memory();
        map(&mut mem, 0x0080_1000, 0x0020_0000);
        assert_eq!(
            translate(&process(), &mem, LDT_DATA, 0x1234, &strict()),
            Ok(0x0020_0234)
        );
    }

    #[test]
    fn test_directory_miss_ignores_low_bits() {
        let mem = memory();
        let pcb = process();
        for offset in (0..0x1000).step_by(0x111) {
            assert_eq!(
                translate(&pcb, &mem, LDT_DATA, 0x1000 + offset, &lax()),
                Err(TranslationFault::PageDirectoryMiss)
            );
        }
    }

    #[test]
    fn test_table_miss() {
        let mut mem = memory();
        map(&mut mem, 0x0080_1000, 0x0020_0000);
        // Directory slot is populated, neighbouring table slot is not.
        assert_eq!(
            translate(&process(), &mem, LDT_DATA, 0x2000, &strict()),
            Err(TranslationFault::PageTableMiss)
        );
    }

    #[test]
    fn test_segment_index_bounds() {
        let mem = memory();
        assert_eq!(
            translate(&process(), &mem, 3, 0, &strict()),
            Err(TranslationFault::SegmentOutOfRange)
        );
        // The code segment shares the data segment's base.
        assert_eq!(
            linear_address_of(&process().ldt, LDT_CODE, 0x10),
            Ok(BASE + 0x10)
        );
    }

    #[test]
    fn test_linear_address_wraps() {
        let ldt = ldt_with_base(0xffff_f000, 0x1000);
        assert_eq!(linear_address_of(&ldt, LDT_DATA, 0x2000), Ok(0x1000));
    }

    #[test]
    fn test_installed_memory_check_is_configurable() {
        let mut mem = FrameMap::new(0x0010_0000);
        mem.install_directory(DIR_PA).unwrap();
        // Frame above installed memory, written directly since map_page refuses it.
        let table_pa = 0x0008_0000;
        mem.install_table(table_pa).unwrap();
        mem.table_mut(DIR_PA)
            .unwrap()
            .entry_mut(2)
            .set_address(table_pa, PageTableFlags::USER_DATA);
        mem.table_mut(table_pa)
            .unwrap()
            .entry_mut(1)
            .set_address(0x0200_0000, PageTableFlags::USER_DATA);

        let pcb = process();
        assert_eq!(
            translate(&pcb, &mem, LDT_DATA, 0x1234, &strict()),
            Err(TranslationFault::OutsideInstalledMemory)
        );
        assert_eq!(
            translate(&pcb, &mem, LDT_DATA, 0x1234, &lax()),
            Ok(0x0200_0234)
        );
    }

    #[test]
    fn test_missing_directory_frame() {
        let mem = FrameMap::new(0x0100_0000);
        assert_eq!(
            translate(&process(), &mem, LDT_DATA, 0, &strict()),
            Err(TranslationFault::TableUnreachable)
        );
    }

    #[test]
    fn test_translate_is_read_only() {
        let mut mem = memory();
        map(&mut mem, 0x0080_1000, 0x0020_0000);
        let pcb = process();
        let before = mem.page_table(DIR_PA).unwrap().entry(2).raw();
        let ldt_before = pcb.ldt;
        let _ = translate(&pcb, &mem, LDT_DATA, 0x1234, &strict());
        assert_eq!(mem.page_table(DIR_PA).unwrap().entry(2).raw(), before);
        assert_eq!(pcb.ldt, ldt_before);
    }
}
