use bitflags::bitflags;

// TEAM_431: i386 two-level paging structures (page directory -> page table -> frame).
// A linear address splits into a 10-bit directory index, a 10-bit table
// index and a 12-bit page offset. The named helpers below are the only
// place those shifts and masks appear.

bitflags! {
    /// i386 page directory / page table entry flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PageTableFlags: u32 {
        const PRESENT = 1 << 0;
        const WRITABLE = 1 << 1;
        const USER_ACCESSIBLE = 1 << 2;
        const WRITE_THROUGH = 1 << 3;
        const NO_CACHE = 1 << 4;
        const ACCESSED = 1 << 5;
        const DIRTY = 1 << 6;
        const HUGE_PAGE = 1 << 7;
        const GLOBAL = 1 << 8;
    }
}

impl PageTableFlags {
    pub const USER_DATA: PageTableFlags = PageTableFlags::PRESENT
        .union(PageTableFlags::WRITABLE)
        .union(PageTableFlags::USER_ACCESSIBLE);
    pub const USER_READ_ONLY: PageTableFlags =
        PageTableFlags::PRESENT.union(PageTableFlags::USER_ACCESSIBLE);
}

/// Page size: 4KB
pub const PAGE_SIZE: u32 = 4096;
/// Page shift (log2 of page size)
pub const PAGE_SHIFT: u32 = 12;
/// Entries in a page directory or page table.
pub const ENTRIES_PER_TABLE: usize = 1024;
/// Keeps the 4 KiB-aligned frame address of an entry.
pub const FRAME_MASK: u32 = 0xffff_f000;
/// Keeps the byte offset inside a page.
pub const PAGE_OFFSET_MASK: u32 = 0x0000_0fff;

const DIRECTORY_SHIFT: u32 = 22;
const INDEX_MASK: u32 = 0x3ff;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct PageTableEntry(u32);

/// Directory entries share the table-entry layout; the address names a page table.
pub type PageDirectoryEntry = PageTableEntry;

impl PageTableEntry {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u32 {
        self.0
    }

    pub fn is_unused(&self) -> bool {
        self.0 == 0
    }

    pub fn is_present(&self) -> bool {
        self.flags().contains(PageTableFlags::PRESENT)
    }

    pub fn flags(&self) -> PageTableFlags {
        PageTableFlags::from_bits_truncate(self.0)
    }

    /// Physical address of the page table (directory entry) or frame (table entry).
    pub fn address(&self) -> u32 {
        frame_address_of(*self)
    }

    pub fn set_address(&mut self, addr: u32, flags: PageTableFlags) {
        debug_assert!(addr & PAGE_OFFSET_MASK == 0, "Physical address must be 4KB aligned");
        self.0 = (addr & FRAME_MASK) | flags.bits();
    }

    pub fn set_unused(&mut self) {
        self.0 = 0;
    }
}

/// Extract the page directory index (bits 22-31).
pub fn directory_index_of(linear: u32) -> usize {
    (linear >> DIRECTORY_SHIFT) as usize
}

/// Extract the page table index (bits 12-21).
pub fn table_index_of(linear: u32) -> usize {
    ((linear >> PAGE_SHIFT) & INDEX_MASK) as usize
}

/// Extract the offset inside the page (bits 0-11).
pub fn page_offset_of(linear: u32) -> u32 {
    linear & PAGE_OFFSET_MASK
}

/// Frame address held by an entry, flags stripped.
pub fn frame_address_of(entry: PageTableEntry) -> u32 {
    entry.0 & FRAME_MASK
}

#[repr(C, align(4096))]
#[derive(Clone)]
pub struct PageTable {
    pub entries: [PageTableEntry; ENTRIES_PER_TABLE],
}

/// A page directory has the same shape as a page table.
pub type PageDirectory = PageTable;

impl Default for PageTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PageTable {
    pub const fn new() -> Self {
        Self {
            entries: [PageTableEntry::empty(); ENTRIES_PER_TABLE],
        }
    }

    pub fn zero(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.set_unused();
        }
    }

    pub fn entry(&self, index: usize) -> &PageTableEntry {
        &self.entries[index]
    }

    pub fn entry_mut(&mut self, index: usize) -> &mut PageTableEntry {
        &mut self.entries[index]
    }
}
