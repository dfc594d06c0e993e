//! Cache Module
//!
//! A TTL/LRU store of serialized views, the backend contract over it, and the
//! catalog invalidation protocol built on that contract.

mod backend;
mod catalog;
mod entry;
mod fence;
mod keys;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use backend::{CacheBackend, InMemoryCache};
pub use catalog::CatalogCache;
pub use entry::CacheEntry;
pub use fence::{FillFence, FillTicket};
pub use keys::{CacheKey, CacheRegion, RegionKey};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
