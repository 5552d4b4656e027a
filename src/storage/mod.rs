//! Storage layer: node memory and slot management.
//!
//! This module owns every node of a tree in a flat slot table and tracks
//! released slots for reuse.

mod arena;
mod freelist;

pub use arena::NodeArena;
pub use freelist::FreeList;
