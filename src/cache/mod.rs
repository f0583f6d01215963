//! Cache Module
//!
//! Slot-backed caching with FIFO eviction and TTL expiration.

mod engine;
mod entry;
mod fifo;
mod layout;
mod shared;
mod stats;


// Re-export public types
pub use engine::CacheEngine;
pub use entry::Entry;
pub use fifo::FifoOrder;
pub use layout::{SlotState, SlotView};
pub use shared::SharedCache;
pub use stats::CacheStats;
