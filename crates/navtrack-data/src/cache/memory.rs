//! In-process cache of fetched tables, keyed by source identifier.

use crate::source::Source;
use crate::table::RawTable;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// A cached fetch result.
#[derive(Debug, Clone)]
pub struct CachedTable {
    /// Parsed export
    pub table: Arc<RawTable>,
    /// When the source was read
    pub fetched_at: DateTime<Utc>,
}

/// Cache of source contents owned by the caller.
///
/// Nothing is evicted implicitly; entries live until [`SourceCache::invalidate`]
/// or [`SourceCache::clear`] is called.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<String, CachedTable>,
    hits: u64,
    misses: u64,
}

impl SourceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a source, recording a hit or a miss.
    pub fn get(&mut self, source: &Source) -> Option<Arc<RawTable>> {
        match self.entries.get(&source.key()) {
            Some(entry) => {
                self.hits += 1;
                Some(Arc::clone(&entry.table))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Look up the full entry without touching the counters.
    pub fn peek(&self, source: &Source) -> Option<&CachedTable> {
        self.entries.get(&source.key())
    }

    /// Store a freshly fetched table, replacing any previous entry.
    pub fn insert(&mut self, source: &Source, table: RawTable) -> Arc<RawTable> {
        let table = Arc::new(table);
        self.entries.insert(
            source.key(),
            CachedTable {
                table: Arc::clone(&table),
                fetched_at: Utc::now(),
            },
        );
        table
    }

    /// Drop the entry for a source. Returns `true` if one was present.
    pub fn invalidate(&mut self, source: &Source) -> bool {
        self.entries.remove(&source.key()).is_some()
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns `true` if the source is cached.
    pub fn contains(&self, source: &Source) -> bool {
        self.entries.contains_key(&source.key())
    }

    /// Current statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached sources
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
}
