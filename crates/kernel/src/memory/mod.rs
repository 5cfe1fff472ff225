//! TEAM_431: Memory-side services of the system-call layer.
//!
//! The paging structures are owned by an external memory manager and reached
//! through `pos_hal::PhysicalMemory`; user buffers through [`user::UserMemory`].

pub mod translate; // Segment + page translation
pub mod user; // Copy-in/copy-out collaborator

pub use translate::{TranslationFault, linear_address_of, translate};
pub use user::{UserAccessError, UserMemory, UserWindow};
