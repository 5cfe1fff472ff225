// TEAM_431: In-memory page-table store.
// Stands in for the memory manager that owns the paging structures: it keeps
// every page-table frame keyed by physical address and serves them to the
// page walker through `PhysicalMemory`.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::mmu::MmuError;
use crate::paging::{
    PAGE_OFFSET_MASK, PAGE_SIZE, PageDirectory, PageTable, PageTableFlags, directory_index_of,
    table_index_of,
};
use crate::traits::{PageAllocator, PhysicalMemory};

/// Page-table frames keyed by physical address.
pub struct FrameMap {
    tables: BTreeMap<u32, Box<PageTable>>,
    installed: u32,
}

impl FrameMap {
    /// Empty map over `installed` bytes of physical memory.
    pub fn new(installed: u32) -> Self {
        Self {
            tables: BTreeMap::new(),
            installed,
        }
    }

    fn check_frame(&self, pa: u32) -> Result<(), MmuError> {
        if pa & PAGE_OFFSET_MASK != 0 {
            return Err(MmuError::Misaligned);
        }
        if !self.contains(pa) {
            return Err(MmuError::OutsideMemory);
        }
        Ok(())
    }

    /// Place an empty page directory at `pa`.
    pub fn install_directory(&mut self, pa: u32) -> Result<&mut PageDirectory, MmuError> {
        self.install_table(pa)
    }

    /// Place an empty page table at `pa`, replacing whatever was there.
    pub fn install_table(&mut self, pa: u32) -> Result<&mut PageTable, MmuError> {
        self.check_frame(pa)?;
        let slot = self
            .tables
            .entry(pa)
            .or_insert_with(|| Box::new(PageTable::new()));
        slot.zero();
        Ok(&mut **slot)
    }

    pub fn table_mut(&mut self, pa: u32) -> Option<&mut PageTable> {
        self.tables.get_mut(&pa).map(|t| &mut **t)
    }

    /// Map the page containing `linear` to `frame` under the directory at `directory_pa`,
    /// allocating the intermediate page table from `alloc` if needed.
    pub fn map_page<A>(
        &mut self,
        directory_pa: u32,
        linear: u32,
        frame: u32,
        flags: PageTableFlags,
        alloc: &mut A,
    ) -> Result<(), MmuError>
    where
        A: PageAllocator + ?Sized,
    {
        self.check_frame(frame)?;
        let di = directory_index_of(linear);
        let pde = *self
            .tables
            .get(&directory_pa)
            .ok_or(MmuError::NoDirectory)?
            .entry(di);

        let table_pa = if pde.is_present() {
            pde.address()
        } else {
            let pa = alloc.alloc_page().ok_or(MmuError::AllocationFailed)?;
            self.install_table(pa)?;
            if let Some(dir) = self.table_mut(directory_pa) {
                dir.entry_mut(di).set_address(
                    pa,
                    PageTableFlags::PRESENT
                        | PageTableFlags::WRITABLE
                        | PageTableFlags::USER_ACCESSIBLE,
                );
            }
            pa
        };

        let table = self.table_mut(table_pa).ok_or(MmuError::AllocationFailed)?;
        table
            .entry_mut(table_index_of(linear))
            .set_address(frame, flags | PageTableFlags::PRESENT);
        Ok(())
    }

    /// Clear the mapping for `linear`, returning the frame it pointed at.
    pub fn unmap_page(&mut self, directory_pa: u32, linear: u32) -> Result<u32, MmuError> {
        let pde = *self
            .tables
            .get(&directory_pa)
            .ok_or(MmuError::NoDirectory)?
            .entry(directory_index_of(linear));
        if !pde.is_present() {
            return Err(MmuError::NotMapped);
        }
        let table = self.table_mut(pde.address()).ok_or(MmuError::NotMapped)?;
        let entry = table.entry_mut(table_index_of(linear));
        if !entry.is_present() {
            return Err(MmuError::NotMapped);
        }
        let frame = entry.address();
        entry.set_unused();
        Ok(frame)
    }
}

impl PhysicalMemory for FrameMap {
    fn page_table(&self, pa: u32) -> Option<&PageTable> {
        self.tables.get(&pa).map(|t| &**t)
    }

    fn installed_bytes(&self) -> u32 {
        self.installed
    }
}

/// Hands out 4 KiB frames from `[start, end)`, reusing freed frames first.
pub struct FrameRange {
    next: u32,
    end: u32,
    freed: Vec<u32>,
}

impl FrameRange {
    /// `start` is rounded up to a frame boundary. A start within the last
    /// partial frame of the address space yields an empty range.
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            next: start
                .checked_add(PAGE_OFFSET_MASK)
                .map_or(end, |s| s & !PAGE_OFFSET_MASK),
            end,
            freed: Vec::new(),
        }
    }
}

impl PageAllocator for FrameRange {
    fn alloc_page(&mut self) -> Option<u32> {
        if let Some(pa) = self.freed.pop() {
            return Some(pa);
        }
        let pa = self.next;
        let next = pa.checked_add(PAGE_SIZE)?;
        if next > self.end {
            return None;
        }
        self.next = next;
        Some(pa)
    }

    fn free_page(&mut self, pa: u32) {
        self.freed.push(pa);
    }
}
