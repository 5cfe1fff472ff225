//! i386 segment descriptors and the per-process local descriptor table.
//!
//! A descriptor is two 32-bit words. The hardware scatters the 32-bit segment
//! base across both of them:
//!
//! ```text
//!  word a: [31..16] base 15..0        [15..0] limit 15..0
//!  word b: [31..24] base 31..24  [23..20] G D/B 0 AVL  [19..16] limit 19..16
//!          [15..8]  P DPL S TYPE      [7..0]  base 23..16
//! ```
//!
//! Everything that needs the base or limit goes through [`segment_base_of`] and
//! [`segment_limit_of`] instead of masking the words by hand.

use bitflags::bitflags;

bitflags! {
    /// Access and granularity bits held in the high descriptor word.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DescriptorFlags: u32 {
        const ACCESSED = 1 << 8;
        /// Writable for data segments, readable for code segments.
        const READ_WRITE = 1 << 9;
        const EXPAND_DOWN = 1 << 10;
        const EXECUTABLE = 1 << 11;
        /// Code/data (as opposed to system) descriptor.
        const SEGMENT = 1 << 12;
        const DPL_LOW = 1 << 13;
        const DPL_HIGH = 1 << 14;
        const PRESENT = 1 << 15;
        const AVAILABLE = 1 << 20;
        const DEFAULT_32 = 1 << 22;
        const GRANULARITY_4K = 1 << 23;
    }
}

impl DescriptorFlags {
    pub const DPL_USER: DescriptorFlags = DescriptorFlags::DPL_LOW.union(DescriptorFlags::DPL_HIGH);
    pub const USER_CODE: DescriptorFlags = DescriptorFlags::PRESENT
        .union(DescriptorFlags::DPL_USER)
        .union(DescriptorFlags::SEGMENT)
        .union(DescriptorFlags::EXECUTABLE)
        .union(DescriptorFlags::READ_WRITE)
        .union(DescriptorFlags::DEFAULT_32)
        .union(DescriptorFlags::GRANULARITY_4K);
    pub const USER_DATA: DescriptorFlags = DescriptorFlags::PRESENT
        .union(DescriptorFlags::DPL_USER)
        .union(DescriptorFlags::SEGMENT)
        .union(DescriptorFlags::READ_WRITE)
        .union(DescriptorFlags::DEFAULT_32)
        .union(DescriptorFlags::GRANULARITY_4K);

    /// Descriptor privilege level (0..=3).
    pub fn dpl(&self) -> u8 {
        ((self.bits() >> 13) & 0b11) as u8
    }
}

const BASE_LOW_MASK: u32 = 0xffff_0000;
const BASE_MID_MASK: u32 = 0x0000_00ff;
const BASE_HIGH_MASK: u32 = 0xff00_0000;
const LIMIT_LOW_MASK: u32 = 0x0000_ffff;
const LIMIT_HIGH_MASK: u32 = 0x000f_0000;

/// Number of entries in a process's local descriptor table.
pub const LDT_ENTRIES: usize = 3;
/// LDT slot of the (unused) null descriptor.
pub const LDT_NULL: usize = 0;
/// LDT slot of the user code segment.
pub const LDT_CODE: usize = 1;
/// LDT slot of the user data segment, the one address translation resolves against.
pub const LDT_DATA: usize = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct SegmentDescriptor {
    /// Low word.
    pub a: u32,
    /// High word.
    pub b: u32,
}

impl SegmentDescriptor {
    pub const fn null() -> Self {
        Self { a: 0, b: 0 }
    }

    /// Split a raw 64-bit descriptor into its two words.
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            a: raw as u32,
            b: (raw >> 32) as u32,
        }
    }

    pub const fn to_raw(&self) -> u64 {
        ((self.b as u64) << 32) | self.a as u64
    }

    /// Encode a descriptor the way the image loader lays one out.
    ///
    /// `limit` is the raw 20-bit limit field; with `GRANULARITY_4K` set it
    /// counts 4 KiB pages.
    pub const fn new(base: u32, limit: u32, flags: DescriptorFlags) -> Self {
        let a = (base << 16) | (limit & LIMIT_LOW_MASK);
        let b = (base & BASE_HIGH_MASK)
            | ((base >> 16) & BASE_MID_MASK)
            | (limit & LIMIT_HIGH_MASK)
            | flags.bits();
        Self { a, b }
    }

    pub fn flags(&self) -> DescriptorFlags {
        DescriptorFlags::from_bits_truncate(self.b)
    }

    pub fn is_present(&self) -> bool {
        self.flags().contains(DescriptorFlags::PRESENT)
    }
}

/// Default user code descriptor: base 0, 640 KiB limit, DPL 3.
pub const DEFAULT_USER_CODE: SegmentDescriptor = SegmentDescriptor::from_raw(0x00c0_fa00_0000_009f);
/// Default user data descriptor: base 0, 640 KiB limit, DPL 3.
pub const DEFAULT_USER_DATA: SegmentDescriptor = SegmentDescriptor::from_raw(0x00c0_f200_0000_009f);

pub type LocalDescriptorTable = [SegmentDescriptor; LDT_ENTRIES];

/// LDT a freshly loaded image starts with.
pub const fn default_ldt() -> LocalDescriptorTable {
    [SegmentDescriptor::null(), DEFAULT_USER_CODE, DEFAULT_USER_DATA]
}

/// LDT whose code and data segments both start at `base` with `limit` bytes.
pub const fn ldt_with_base(base: u32, limit: u32) -> LocalDescriptorTable {
    // Byte limits above 1 MiB have to be expressed in 4 KiB pages.
    let pages = limit.saturating_sub(1) >> 12;
    [
        SegmentDescriptor::null(),
        SegmentDescriptor::new(base, pages, DescriptorFlags::USER_CODE),
        SegmentDescriptor::new(base, pages, DescriptorFlags::USER_DATA),
    ]
}

/// Reassemble the 32-bit segment base from both descriptor words.
pub fn segment_base_of(desc: &SegmentDescriptor) -> u32 {
    ((desc.a & BASE_LOW_MASK) >> 16) | ((desc.b & BASE_MID_MASK) << 16) | (desc.b & BASE_HIGH_MASK)
}

/// Segment limit in bytes (inclusive), with granularity applied.
pub fn segment_limit_of(desc: &SegmentDescriptor) -> u32 {
    let raw = (desc.a & LIMIT_LOW_MASK) | (desc.b & LIMIT_HIGH_MASK);
    if desc.flags().contains(DescriptorFlags::GRANULARITY_4K) {
        (raw << 12) | 0xfff
    } else {
        raw
    }
}
