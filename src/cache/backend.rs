//! Cache Backend
//!
//! The get/put/evict contract the catalog cache is written against, and the
//! in-process implementation backed by `CacheStore`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheKey, CacheRegion, CacheStats, CacheStore, RegionKey};
use crate::error::{CacheError, CacheResult};

// == Cache Backend Trait ==
/// A region-partitioned store of serialized values.
///
/// `get` returns `Ok(None)` on a miss; `Err` means the backend itself failed.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, region: CacheRegion, key: CacheKey) -> CacheResult<Option<String>>;
    async fn put(&self, region: CacheRegion, key: CacheKey, value: String) -> CacheResult<()>;
    async fn evict(&self, region: CacheRegion, key: CacheKey) -> CacheResult<()>;
    async fn stats(&self) -> CacheResult<CacheStats>;
}

// == In-memory Backend ==
/// `CacheBackend` over a shared `CacheStore`.
#[derive(Debug, Clone)]
pub struct InMemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl InMemoryCache {
    pub fn new(max_entries: usize, ttl: Option<Duration>) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries, ttl))),
        }
    }

    /// Shared handle to the underlying store, for the cleanup task.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        self.store.clone()
    }

    /// Whether a live entry exists, without affecting stats or LRU order.
    pub async fn contains(&self, region: CacheRegion, key: CacheKey) -> bool {
        self.store
            .read()
            .await
            .contains(&RegionKey::new(region, key))
    }

    /// All live entry addresses.
    pub async fn keys(&self) -> Vec<RegionKey> {
        self.store.read().await.keys()
    }
}

#[async_trait]
impl CacheBackend for InMemoryCache {
    async fn get(&self, region: CacheRegion, key: CacheKey) -> CacheResult<Option<String>> {
        // write lock: lookups update LRU order and stats
        let mut store = self.store.write().await;
        match store.get(&RegionKey::new(region, key)) {
            Ok(value) => Ok(Some(value)),
            Err(CacheError::NotFound(_)) | Err(CacheError::Expired(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn put(&self, region: CacheRegion, key: CacheKey, value: String) -> CacheResult<()> {
        self.store
            .write()
            .await
            .set(RegionKey::new(region, key), value)
    }

    async fn evict(&self, region: CacheRegion, key: CacheKey) -> CacheResult<()> {
        self.store
            .write()
            .await
            .delete(&RegionKey::new(region, key));
        Ok(())
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        Ok(self.store.read().await.stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_miss_is_ok_none() {
        let cache = InMemoryCache::new(10, None);
        let got = cache
            .get(CacheRegion::Dishes, CacheKey::Id(Uuid::new_v4()))
            .await
            .unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn test_put_get_evict() {
        let cache = InMemoryCache::new(10, None);
        let key = CacheKey::Pair(Uuid::new_v4(), Uuid::new_v4());

        cache
            .put(CacheRegion::Dishes, key, "{\"a\":1}".to_string())
            .await
            .unwrap();
        assert!(cache.contains(CacheRegion::Dishes, key).await);
        assert!(!cache.contains(CacheRegion::Restaurants, key).await);

        cache.evict(CacheRegion::Dishes, key).await.unwrap();
        assert!(cache.get(CacheRegion::Dishes, key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_evicting_absent_key_is_ok() {
        let cache = InMemoryCache::new(10, None);
        let result = cache
            .evict(CacheRegion::Restaurants, CacheKey::Id(Uuid::new_v4()))
            .await;
        assert!(result.is_ok());
    }
}
