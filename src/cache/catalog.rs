//! Catalog Cache
//!
//! The invalidation protocol for the restaurant read path. Two regions are
//! used: `dishes` holds single-dish views keyed `(restaurant, dish)` and menu
//! views keyed `restaurant`; `restaurants` holds restaurant views keyed
//! `restaurant`. A restaurant view embeds its dishes, so every dish write
//! evicts it as well as the menu.
//!
//! | write            | put                  | evict                                  |
//! |------------------|----------------------|----------------------------------------|
//! | dish created     | `dishes[(r, d)]`     | `dishes[r]`, `restaurants[r]`          |
//! | dish updated     | `dishes[(r, d)]`     | `dishes[r]`, `restaurants[r]`          |
//! | dish deleted     |                      | `dishes[(r, d)]`, `dishes[r]`, `restaurants[r]` |
//! | restaurant updated |                    | `restaurants[r]`                       |
//! | restaurant deleted |                    | `restaurants[r]`, `dishes[r]`, every `dishes[(r, d)]` |
//!
//! Nothing here fails a request: backend errors and undecodable values are
//! logged and treated as misses. Populating on a read miss goes through a
//! `FillTicket` taken before the store read (see `fence`).

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::fence::{FillFence, FillTicket};
use crate::cache::{CacheBackend, CacheKey, CacheRegion, CacheStats};
use crate::models::{DishResponse, RestaurantMenu, RestaurantResponse};

// == Catalog Cache ==
pub struct CatalogCache {
    backend: Arc<dyn CacheBackend>,
    fence: FillFence,
}

impl CatalogCache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            fence: FillFence::default(),
        }
    }

    /// Issues a ticket for populating entries of `restaurant_id`.
    pub fn ticket(&self, restaurant_id: Uuid) -> FillTicket<'_> {
        self.fence.ticket(restaurant_id)
    }

    /// Restaurants with reads in flight.
    #[cfg(test)]
    pub fn pending_fills(&self) -> usize {
        self.fence.tracked()
    }

    // == Reads ==
    pub async fn dish(&self, restaurant_id: Uuid, dish_id: Uuid) -> Option<DishResponse> {
        self.read(CacheRegion::Dishes, CacheKey::Pair(restaurant_id, dish_id))
            .await
    }

    pub async fn menu(&self, restaurant_id: Uuid) -> Option<RestaurantMenu> {
        self.read(CacheRegion::Dishes, CacheKey::Id(restaurant_id))
            .await
    }

    pub async fn restaurant(&self, restaurant_id: Uuid) -> Option<RestaurantResponse> {
        self.read(CacheRegion::Restaurants, CacheKey::Id(restaurant_id))
            .await
    }

    // == Populate on Miss ==
    pub async fn fill_dish(&self, ticket: &FillTicket<'_>, dish: &DishResponse) {
        let key = CacheKey::Pair(ticket.restaurant_id(), dish.id);
        self.fill(ticket, CacheRegion::Dishes, key, dish).await;
    }

    pub async fn fill_menu(&self, ticket: &FillTicket<'_>, menu: &RestaurantMenu) {
        let key = CacheKey::Id(ticket.restaurant_id());
        self.fill(ticket, CacheRegion::Dishes, key, menu).await;
    }

    pub async fn fill_restaurant(
        &self,
        ticket: &FillTicket<'_>,
        restaurant: &RestaurantResponse,
    ) {
        let key = CacheKey::Id(ticket.restaurant_id());
        self.fill(ticket, CacheRegion::Restaurants, key, restaurant)
            .await;
    }

    // == Write Protocol ==
    /// A dish was saved under `restaurant_id`; call after the store write.
    pub async fn dish_created(&self, restaurant_id: Uuid, dish: &DishResponse) {
        self.dish_saved(restaurant_id, dish).await;
    }

    /// A dish was updated under `restaurant_id`; call after the store write.
    pub async fn dish_updated(&self, restaurant_id: Uuid, dish: &DishResponse) {
        self.dish_saved(restaurant_id, dish).await;
    }

    pub async fn dish_deleted(&self, restaurant_id: Uuid, dish_id: Uuid) {
        self.fence.invalidate(restaurant_id);
        self.evict(CacheRegion::Dishes, CacheKey::Pair(restaurant_id, dish_id))
            .await;
        self.evict(CacheRegion::Dishes, CacheKey::Id(restaurant_id))
            .await;
        self.evict(CacheRegion::Restaurants, CacheKey::Id(restaurant_id))
            .await;
    }

    pub async fn restaurant_updated(&self, restaurant_id: Uuid) {
        self.fence.invalidate(restaurant_id);
        self.evict(CacheRegion::Restaurants, CacheKey::Id(restaurant_id))
            .await;
    }

    /// The restaurant and the listed dishes were removed from the store.
    pub async fn restaurant_deleted(&self, restaurant_id: Uuid, dish_ids: &[Uuid]) {
        self.fence.invalidate(restaurant_id);
        self.evict(CacheRegion::Restaurants, CacheKey::Id(restaurant_id))
            .await;
        self.evict(CacheRegion::Dishes, CacheKey::Id(restaurant_id))
            .await;
        for dish_id in dish_ids {
            self.evict(CacheRegion::Dishes, CacheKey::Pair(restaurant_id, *dish_id))
                .await;
        }
    }

    /// Backend statistics, if the backend can report them.
    pub async fn stats(&self) -> Option<CacheStats> {
        match self.backend.stats().await {
            Ok(stats) => Some(stats),
            Err(err) => {
                warn!(error = %err, "Cache stats unavailable");
                None
            }
        }
    }

    // == Internals ==
    async fn dish_saved(&self, restaurant_id: Uuid, dish: &DishResponse) {
        self.fence.invalidate(restaurant_id);
        self.evict(CacheRegion::Dishes, CacheKey::Id(restaurant_id))
            .await;
        self.evict(CacheRegion::Restaurants, CacheKey::Id(restaurant_id))
            .await;
        self.put(
            CacheRegion::Dishes,
            CacheKey::Pair(restaurant_id, dish.id),
            dish,
        )
        .await;
    }

    async fn fill<T: Serialize>(
        &self,
        ticket: &FillTicket<'_>,
        region: CacheRegion,
        key: CacheKey,
        value: &T,
    ) {
        if !ticket.is_current() {
            debug!(%region, %key, "Skipping fill: restaurant invalidated since read began");
            return;
        }
        self.put(region, key, value).await;
        // an invalidation may have run its evictions while the put was in flight
        if !ticket.is_current() {
            debug!(%region, %key, "Dropping fill raced by an invalidation");
            self.evict(region, key).await;
        }
    }

    async fn read<T: DeserializeOwned>(&self, region: CacheRegion, key: CacheKey) -> Option<T> {
        match self.backend.get(region, key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!(%region, %key, "Cache hit");
                    Some(value)
                }
                Err(err) => {
                    warn!(%region, %key, error = %err, "Dropping undecodable cache entry");
                    self.evict(region, key).await;
                    None
                }
            },
            Ok(None) => {
                debug!(%region, %key, "Cache miss");
                None
            }
            Err(err) => {
                warn!(%region, %key, error = %err, "Cache read failed, treating as miss");
                None
            }
        }
    }

    async fn put<T: Serialize>(&self, region: CacheRegion, key: CacheKey, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%region, %key, error = %err, "Cache value not serializable, skipping put");
                return;
            }
        };
        if let Err(err) = self.backend.put(region, key, raw).await {
            warn!(%region, %key, error = %err, "Cache put failed");
            // a failed replace must not leave the previous value readable
            self.evict(region, key).await;
        }
    }

    async fn evict(&self, region: CacheRegion, key: CacheKey) {
        if let Err(err) = self.backend.evict(region, key).await {
            warn!(%region, %key, error = %err, "Cache evict failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;
    use crate::domain::Dish;
    use crate::error::CacheResult;
    use async_trait::async_trait;
    use std::time::Duration;

    /// In-memory backend with artificial latency on writes.
    struct SlowBackend {
        inner: InMemoryCache,
        put_delay: Duration,
        evict_delay: Duration,
    }

    #[async_trait]
    impl CacheBackend for SlowBackend {
        async fn get(&self, region: CacheRegion, key: CacheKey) -> CacheResult<Option<String>> {
            self.inner.get(region, key).await
        }

        async fn put(&self, region: CacheRegion, key: CacheKey, value: String) -> CacheResult<()> {
            tokio::time::sleep(self.put_delay).await;
            self.inner.put(region, key, value).await
        }

        async fn evict(&self, region: CacheRegion, key: CacheKey) -> CacheResult<()> {
            tokio::time::sleep(self.evict_delay).await;
            self.inner.evict(region, key).await
        }

        async fn stats(&self) -> CacheResult<CacheStats> {
            self.inner.stats().await
        }
    }

    fn slow_setup(put_delay: Duration, evict_delay: Duration) -> (InMemoryCache, CatalogCache) {
        let inner = InMemoryCache::new(100, None);
        let backend = SlowBackend {
            inner: inner.clone(),
            put_delay,
            evict_delay,
        };
        (inner, CatalogCache::new(Arc::new(backend)))
    }

    fn setup() -> (InMemoryCache, CatalogCache) {
        let backend = InMemoryCache::new(100, None);
        let cache = CatalogCache::new(Arc::new(backend.clone()));
        (backend, cache)
    }

    fn dish_view(price: f64) -> DishResponse {
        DishResponse::from(&Dish::new("Ramen", None, price))
    }

    async fn seed(cache: &CatalogCache, restaurant_id: Uuid, dish: &DishResponse) {
        let ticket = cache.ticket(restaurant_id);
        cache.fill_dish(&ticket, dish).await;
        cache
            .fill_menu(
                &ticket,
                &RestaurantMenu {
                    dishes: vec![dish.clone()],
                },
            )
            .await;
        cache
            .fill_restaurant(
                &ticket,
                &RestaurantResponse {
                    id: restaurant_id,
                    name: "Ichiran".to_string(),
                    city_id: Uuid::new_v4(),
                    dishes: vec![dish.clone()],
                },
            )
            .await;
    }

    #[tokio::test]
    async fn test_fill_then_read() {
        let (_, cache) = setup();
        let restaurant_id = Uuid::new_v4();
        let dish = dish_view(9.0);
        seed(&cache, restaurant_id, &dish).await;

        assert_eq!(cache.dish(restaurant_id, dish.id).await, Some(dish.clone()));
        assert_eq!(cache.menu(restaurant_id).await.unwrap().dishes, vec![dish]);
        assert!(cache.restaurant(restaurant_id).await.is_some());
    }

    #[tokio::test]
    async fn test_dish_updated_replaces_single_and_evicts_views() {
        let (backend, cache) = setup();
        let restaurant_id = Uuid::new_v4();
        let dish = dish_view(9.0);
        seed(&cache, restaurant_id, &dish).await;

        let mut updated = dish.clone();
        updated.price = 11.0;
        cache.dish_updated(restaurant_id, &updated).await;

        assert_eq!(cache.dish(restaurant_id, dish.id).await, Some(updated));
        assert!(
            !backend
                .contains(CacheRegion::Dishes, CacheKey::Id(restaurant_id))
                .await
        );
        assert!(
            !backend
                .contains(CacheRegion::Restaurants, CacheKey::Id(restaurant_id))
                .await
        );
    }

    #[tokio::test]
    async fn test_dish_deleted_evicts_exactly_three_entries() {
        let (backend, cache) = setup();
        let restaurant_id = Uuid::new_v4();
        let other_restaurant = Uuid::new_v4();
        let dish = dish_view(9.0);
        let other_dish = dish_view(3.0);
        seed(&cache, restaurant_id, &dish).await;
        seed(&cache, other_restaurant, &other_dish).await;
        assert_eq!(backend.keys().await.len(), 6);

        cache.dish_deleted(restaurant_id, dish.id).await;

        let remaining = backend.keys().await;
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().all(|k| k.key.owner() == other_restaurant));
    }

    #[tokio::test]
    async fn test_stale_fill_is_dropped_after_invalidation() {
        let (backend, cache) = setup();
        let restaurant_id = Uuid::new_v4();
        let stale = RestaurantMenu {
            dishes: vec![dish_view(1.0)],
        };

        let ticket = cache.ticket(restaurant_id);
        cache.dish_created(restaurant_id, &dish_view(2.0)).await;
        cache.fill_menu(&ticket, &stale).await;

        assert!(
            !backend
                .contains(CacheRegion::Dishes, CacheKey::Id(restaurant_id))
                .await
        );
    }

    #[tokio::test]
    async fn test_invalidation_of_other_restaurant_does_not_block_fill() {
        let (_, cache) = setup();
        let restaurant_id = Uuid::new_v4();
        let ticket = cache.ticket(restaurant_id);
        cache.restaurant_updated(Uuid::new_v4()).await;

        let menu = RestaurantMenu { dishes: vec![] };
        cache.fill_menu(&ticket, &menu).await;

        assert_eq!(cache.menu(restaurant_id).await, Some(menu));
    }

    #[tokio::test]
    async fn test_restaurant_deleted_evicts_dish_entries() {
        let (backend, cache) = setup();
        let restaurant_id = Uuid::new_v4();
        let dish = dish_view(9.0);
        seed(&cache, restaurant_id, &dish).await;

        cache.restaurant_deleted(restaurant_id, &[dish.id]).await;

        assert!(backend.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss_and_is_dropped() {
        let (backend, cache) = setup();
        let restaurant_id = Uuid::new_v4();
        backend
            .put(
                CacheRegion::Dishes,
                CacheKey::Id(restaurant_id),
                "not json".to_string(),
            )
            .await
            .unwrap();

        assert!(cache.menu(restaurant_id).await.is_none());
        assert!(
            !backend
                .contains(CacheRegion::Dishes, CacheKey::Id(restaurant_id))
                .await
        );
    }

    #[tokio::test]
    async fn test_fill_raced_by_invalidation_is_evicted() {
        let (backend, cache) = slow_setup(Duration::from_millis(100), Duration::ZERO);
        let restaurant_id = Uuid::new_v4();
        let stale = RestaurantMenu {
            dishes: vec![dish_view(1.0)],
        };

        let ticket = cache.ticket(restaurant_id);
        let fill = cache.fill_menu(&ticket, &stale);
        let invalidate = async {
            // lands while the fill's put is still in flight
            tokio::time::sleep(Duration::from_millis(20)).await;
            cache.restaurant_deleted(restaurant_id, &[]).await;
        };
        tokio::join!(fill, invalidate);

        assert!(
            !backend
                .contains(CacheRegion::Dishes, CacheKey::Id(restaurant_id))
                .await
        );
    }

    #[tokio::test]
    async fn test_slow_eviction_does_not_block_other_restaurants() {
        let (_, cache) = slow_setup(Duration::ZERO, Duration::from_millis(300));
        let cache = Arc::new(cache);
        let busy = Uuid::new_v4();
        let idle = Uuid::new_v4();

        let eviction = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.restaurant_updated(busy).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let menu = RestaurantMenu { dishes: vec![] };
        let ticket = cache.ticket(idle);
        let filled = tokio::time::timeout(
            Duration::from_millis(100),
            cache.fill_menu(&ticket, &menu),
        )
        .await;
        assert!(filled.is_ok());
        assert_eq!(cache.menu(idle).await, Some(menu));

        eviction.await.unwrap();
    }

    #[tokio::test]
    async fn test_fence_forgets_restaurants_without_readers() {
        let (_, cache) = setup();
        let restaurant_id = Uuid::new_v4();
        let dish = dish_view(4.0);

        seed(&cache, restaurant_id, &dish).await;
        cache.restaurant_deleted(restaurant_id, &[dish.id]).await;
        for _ in 0..10 {
            cache.restaurant_updated(Uuid::new_v4()).await;
        }

        assert_eq!(cache.pending_fills(), 0);
    }
}
