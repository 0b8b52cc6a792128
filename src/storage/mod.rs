//! Associative storage used by the link graph
//!
//! The graph keeps its url → node id index behind [`KeyValueStore`] so the
//! index can be swapped without touching the dense per-node arrays.

mod memory;
mod traits;

pub use memory::MemoryStore;
pub use traits::KeyValueStore;
