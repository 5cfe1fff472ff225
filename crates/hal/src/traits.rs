//! Architecture-independent traits for hardware abstraction.
//!
//! TEAM_431: Decouples the kernel from how physical memory is reached.

use crate::paging::PageTable;

/// Read-only view of physical memory as seen by the page walker.
///
/// The kernel proper never dereferences physical addresses itself; the memory
/// manager that owns the page tables hands them out through this trait.
pub trait PhysicalMemory: Send + Sync {
    /// The page-table frame at physical address `pa`, if `pa` names one.
    fn page_table(&self, pa: u32) -> Option<&PageTable>;

    /// Bytes of installed physical memory, starting at address 0.
    fn installed_bytes(&self) -> u32;

    /// Whether `pa` lies inside installed memory.
    fn contains(&self, pa: u32) -> bool {
        pa < self.installed_bytes()
    }
}

/// Trait for physical page allocation, used when populating page tables.
pub trait PageAllocator {
    /// Allocate a 4KB physical page.
    fn alloc_page(&mut self) -> Option<u32>;
    /// Free a 4KB physical page.
    fn free_page(&mut self, pa: u32);
}
