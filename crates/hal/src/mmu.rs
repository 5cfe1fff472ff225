//! TEAM_431: i386 page walk.
//!
//! Resolves a linear address to a physical address by reading the page
//! directory and the page table it references. The walk is read-only: it never
//! sets accessed/dirty bits or touches any entry.

pub use crate::paging::{
    ENTRIES_PER_TABLE, FRAME_MASK, PAGE_OFFSET_MASK, PAGE_SIZE, PageDirectory, PageDirectoryEntry,
    PageTable, PageTableEntry, PageTableFlags, directory_index_of, frame_address_of, page_offset_of,
    table_index_of,
};
use crate::traits::PhysicalMemory;
use pos_error::define_kernel_error;

define_kernel_error! {
    pub enum MmuError(0x01) {
        AllocationFailed = 0x01 => "Page table allocation failed",
        Misaligned = 0x02 => "Address not properly aligned",
        OutsideMemory = 0x03 => "Address outside installed memory",
        NoDirectory = 0x04 => "Page directory not installed",
        NotMapped = 0x05 => "Address not mapped",
    }
}

define_kernel_error! {
    pub enum WalkError(0x02) {
        DirectoryNotPresent = 0x01 => "Page directory entry not present",
        TableNotPresent = 0x02 => "Page table entry not present",
        TableUnreachable = 0x03 => "Page table frame not accessible",
    }
}

/// Result of a successful walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Translation {
    pub phys: u32,
    pub directory_entry: PageDirectoryEntry,
    pub table_entry: PageTableEntry,
}

/// Walk `directory` for `linear`.
///
/// The directory entry must be present; its table must be reachable through
/// `mem`; the table entry must be present. The physical address is the table
/// entry's frame with the linear address's page offset.
pub fn walk<M>(mem: &M, directory: &PageDirectory, linear: u32) -> Result<Translation, WalkError>
where
    M: PhysicalMemory + ?Sized,
{
    let pde = *directory.entry(directory_index_of(linear));
    if !pde.is_present() {
        return Err(WalkError::DirectoryNotPresent);
    }

    let table = mem
        .page_table(frame_address_of(pde))
        .ok_or(WalkError::TableUnreachable)?;

    let pte = *table.entry(table_index_of(linear));
    if !pte.is_present() {
        return Err(WalkError::TableNotPresent);
    }

    Ok(Translation {
        phys: (frame_address_of(pte) & FRAME_MASK) | (linear & PAGE_OFFSET_MASK),
        directory_entry: pde,
        table_entry: pte,
    })
}
