//! Storage primitives shared by the cache policies.

pub mod intrusive_list;
pub mod slot_arena;

pub use intrusive_list::IntrusiveList;
pub use slot_arena::{SlotArena, SlotId};
