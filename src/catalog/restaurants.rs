//! Restaurant operations.
//!
//! Restaurant is the aggregate root for dishes: deleting it deletes its
//! dishes first, then the restaurant itself.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::CatalogCache;
use crate::catalog::locks::WriteLocks;
use crate::catalog::run_detached;
use crate::catalog::validation::Validator;
use crate::error::{ApiError, Result};
use crate::models::{
    CreateRestaurantRequest, PageResponse, RestaurantResponse, UpdateRestaurantRequest,
};
use crate::store::{EntityStore, PageRequest};

#[derive(Clone)]
pub struct RestaurantService {
    store: Arc<dyn EntityStore>,
    validator: Validator,
    cache: Arc<CatalogCache>,
    locks: Arc<WriteLocks>,
}

impl RestaurantService {
    pub fn new(
        store: Arc<dyn EntityStore>,
        validator: Validator,
        cache: Arc<CatalogCache>,
        locks: Arc<WriteLocks>,
    ) -> Self {
        Self {
            store,
            validator,
            cache,
            locks,
        }
    }

    pub async fn list(&self, request: PageRequest) -> Result<PageResponse<RestaurantResponse>> {
        let page = self.store.find_restaurants(request).await?;
        Ok(PageResponse::from_page(page, |restaurant| {
            RestaurantResponse::from(restaurant)
        }))
    }

    pub async fn get(&self, restaurant_id: Uuid) -> Result<RestaurantResponse> {
        if let Some(cached) = self.cache.restaurant(restaurant_id).await {
            return Ok(cached);
        }

        let ticket = self.cache.ticket(restaurant_id);
        let restaurant = self.validator.get_restaurant_or_fail(restaurant_id).await?;
        let view = RestaurantResponse::from(&restaurant);
        self.cache.fill_restaurant(&ticket, &view).await;
        Ok(view)
    }

    pub async fn create(&self, request: CreateRestaurantRequest) -> Result<RestaurantResponse> {
        if let Some(message) = request.validate() {
            return Err(ApiError::InvalidRequest(message));
        }
        self.validator.get_city_or_fail(request.city_id).await?;

        let restaurant = self.store.save_restaurant(request.into_restaurant()).await?;
        info!(restaurant_id = %restaurant.id, city_id = %restaurant.city_id, "Restaurant created");
        Ok(RestaurantResponse::from(&restaurant))
    }

    pub async fn update(
        &self,
        restaurant_id: Uuid,
        request: UpdateRestaurantRequest,
    ) -> Result<RestaurantResponse> {
        if let Some(message) = request.validate() {
            return Err(ApiError::InvalidRequest(message));
        }
        let service = self.clone();
        run_detached(async move { service.commit_update(restaurant_id, request).await }).await
    }

    async fn commit_update(
        &self,
        restaurant_id: Uuid,
        request: UpdateRestaurantRequest,
    ) -> Result<RestaurantResponse> {
        let _guard = self.locks.lock(restaurant_id).await;
        let mut restaurant = self.validator.get_restaurant_or_fail(restaurant_id).await?;
        if let Some(city_id) = request.city_id {
            self.validator.get_city_or_fail(city_id).await?;
        }

        request.apply_to(&mut restaurant);
        let restaurant = self.store.save_restaurant(restaurant).await?;

        self.cache.restaurant_updated(restaurant_id).await;
        info!(%restaurant_id, "Restaurant updated");
        Ok(RestaurantResponse::from(&restaurant))
    }

    /// Deletes the restaurant and every dish it owns; returns its last state.
    pub async fn delete(&self, restaurant_id: Uuid) -> Result<RestaurantResponse> {
        let service = self.clone();
        run_detached(async move { service.commit_delete(restaurant_id).await }).await
    }

    async fn commit_delete(&self, restaurant_id: Uuid) -> Result<RestaurantResponse> {
        let _guard = self.locks.lock(restaurant_id).await;
        let restaurant = self.validator.get_restaurant_or_fail(restaurant_id).await?;

        let mut deleted = Vec::with_capacity(restaurant.dishes.len());
        for dish in &restaurant.dishes {
            if let Err(err) = self.store.delete_dish(dish.id).await {
                warn!(%restaurant_id, dish_id = %dish.id, error = %err, "Cascade delete interrupted");
                // what did commit must not stay visible through the cache
                self.cache.restaurant_deleted(restaurant_id, &deleted).await;
                return Err(err.into());
            }
            deleted.push(dish.id);
        }
        if let Err(err) = self.store.delete_restaurant(restaurant_id).await {
            self.cache.restaurant_deleted(restaurant_id, &deleted).await;
            return Err(err.into());
        }

        self.cache.restaurant_deleted(restaurant_id, &deleted).await;
        info!(%restaurant_id, dishes = deleted.len(), "Restaurant deleted");
        Ok(RestaurantResponse::from(&restaurant))
    }
}
