#![cfg_attr(not(any(test, feature = "std")), no_std)]

// TEAM_431: HAL crate for the i386 memory model.
// Segment descriptors and two-level paging are described here as plain data;
// how physical memory is actually reached is left to `PhysicalMemory`
// implementors.

extern crate alloc;

pub mod console;
pub mod descriptor;
pub mod memory;
pub mod mmu;
pub mod paging;
pub mod traits;

pub use descriptor::{
    DescriptorFlags, LDT_CODE, LDT_DATA, LDT_ENTRIES, LocalDescriptorTable, SegmentDescriptor,
    segment_base_of, segment_limit_of,
};
pub use memory::{FrameMap, FrameRange};
pub use mmu::{MmuError, Translation, WalkError, walk};
pub use paging::{
    PageDirectory, PageTable, PageTableEntry, PageTableFlags, directory_index_of,
    frame_address_of, page_offset_of, table_index_of,
};
pub use traits::{PageAllocator, PhysicalMemory};
