//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL
//! expiration, addressed by `RegionKey`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, CacheStats, LruTracker, RegionKey, MAX_VALUE_SIZE};
use crate::error::{CacheError, CacheResult};

// == Cache Store ==
/// Bounded TTL/LRU map of serialized values.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<RegionKey, CacheEntry>,
    lru: LruTracker<RegionKey>,
    stats: CacheStats,
    max_entries: usize,
    ttl: Option<Duration>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries`; entries live for `ttl`
    /// (None = until evicted).
    pub fn new(max_entries: usize, ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            ttl,
        }
    }

    // == Set ==
    /// Stores a value, replacing any previous one and resetting its TTL.
    ///
    /// At capacity, the least recently used entry is evicted first.
    pub fn set(&mut self, key: RegionKey, value: String) -> CacheResult<()> {
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::ValueTooLarge(format!(
                "{} is {} bytes, limit is {} bytes",
                key,
                value.len(),
                MAX_VALUE_SIZE
            )));
        }

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                }
                None => {
                    return Err(CacheError::CacheFull(format!(
                        "no room for {} and nothing to evict",
                        key
                    )));
                }
            }
        }

        self.entries.insert(key, CacheEntry::new(value, self.ttl));
        self.lru.touch(&key);
        self.stats.record_put();
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    // == Get ==
    /// Returns a live value. Expired entries are removed and count as misses.
    pub fn get(&mut self, key: &RegionKey) -> CacheResult<String> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        if entry.is_expired() {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            return Err(CacheError::Expired(key.to_string()));
        }

        let value = entry.value.clone();
        self.stats.record_hit();
        self.lru.touch(key);
        Ok(value)
    }

    // == Delete ==
    /// Removes an entry. Returns whether one was present.
    pub fn delete(&mut self, key: &RegionKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.record_invalidation();
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    /// Whether a live entry exists, without touching LRU order or stats.
    pub fn contains(&self, key: &RegionKey) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    /// All live keys, in no particular order.
    pub fn keys(&self) -> Vec<RegionKey> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, _)| *key)
            .collect()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<RegionKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| *key)
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired.len());
        self.stats.set_total_entries(self.entries.len());
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
