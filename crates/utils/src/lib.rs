#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod arena;

pub use arena::{Arena, SlotId};

// Re-export spin crate types as our lock API
pub use spin::{Mutex, MutexGuard};

// Re-export hashbrown collections
pub use hashbrown::HashMap;

// ============================================================================
// Unit Tests
// ============================================================================
