//! Caching layer for fetched sources.

pub mod memory;

pub use memory::{CacheStats, CachedTable, SourceCache};
