//! Dish operations, scoped under a restaurant.
//!
//! Writes run validate → store write → cache effects, all under the
//! restaurant's write lock and on a detached task. Reads check the cache
//! first and populate it on a miss.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::CatalogCache;
use crate::catalog::locks::WriteLocks;
use crate::catalog::run_detached;
use crate::catalog::validation::{get_dish_in_restaurant_or_fail, Validator};
use crate::error::{ApiError, Result};
use crate::models::{CreateDishRequest, DishResponse, RestaurantMenu, UpdateDishRequest};
use crate::store::EntityStore;

#[derive(Clone)]
pub struct DishService {
    store: Arc<dyn EntityStore>,
    validator: Validator,
    cache: Arc<CatalogCache>,
    locks: Arc<WriteLocks>,
}

impl DishService {
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

    pub async fn get(&self, restaurant_id: Uuid, dish_id: Uuid) -> Result<DishResponse> {
        if let Some(cached) = self.cache.dish(restaurant_id, dish_id).await {
            return Ok(cached);
        }

        let ticket = self.cache.ticket(restaurant_id);
        let restaurant = self.validator.get_restaurant_or_fail(restaurant_id).await?;
        let dish = DishResponse::from(get_dish_in_restaurant_or_fail(&restaurant, dish_id)?);
        self.cache.fill_dish(&ticket, &dish).await;
        Ok(dish)
    }

    pub async fn menu(&self, restaurant_id: Uuid) -> Result<RestaurantMenu> {
        if let Some(cached) = self.cache.menu(restaurant_id).await {
            return Ok(cached);
        }

        let ticket = self.cache.ticket(restaurant_id);
        let restaurant = self.validator.get_restaurant_or_fail(restaurant_id).await?;
        let menu = RestaurantMenu::from(&restaurant);
        self.cache.fill_menu(&ticket, &menu).await;
        debug!(%restaurant_id, dishes = menu.dishes.len(), "Menu loaded from store");
        Ok(menu)
    }

    pub async fn create(
        &self,
        restaurant_id: Uuid,
        request: CreateDishRequest,
    ) -> Result<DishResponse> {
        if let Some(message) = request.validate() {
            return Err(ApiError::InvalidRequest(message));
        }
        let service = self.clone();
        run_detached(async move { service.commit_create(restaurant_id, request).await }).await
    }

    async fn commit_create(
        &self,
        restaurant_id: Uuid,
        request: CreateDishRequest,
    ) -> Result<DishResponse> {
        let _guard = self.locks.lock(restaurant_id).await;
        let mut restaurant = self.validator.get_restaurant_or_fail(restaurant_id).await?;

        let dish = self.store.save_dish(request.into_dish()).await?;
        restaurant.dishes.push(dish.clone());
        self.store.save_restaurant(restaurant).await?;

        let view = DishResponse::from(&dish);
        self.cache.dish_created(restaurant_id, &view).await;
        info!(%restaurant_id, dish_id = %dish.id, "Dish created");
        Ok(view)
    }

    pub async fn update(
        &self,
        restaurant_id: Uuid,
        dish_id: Uuid,
        request: UpdateDishRequest,
    ) -> Result<DishResponse> {
        if let Some(message) = request.validate() {
            return Err(ApiError::InvalidRequest(message));
        }
        let service = self.clone();
        run_detached(async move {
            service
                .commit_update(restaurant_id, dish_id, request)
                .await
        })
        .await
    }

    async fn commit_update(
        &self,
        restaurant_id: Uuid,
        dish_id: Uuid,
        request: UpdateDishRequest,
    ) -> Result<DishResponse> {
        let _guard = self.locks.lock(restaurant_id).await;
        let restaurant = self.validator.get_restaurant_or_fail(restaurant_id).await?;
        let mut dish = get_dish_in_restaurant_or_fail(&restaurant, dish_id)?.clone();

        request.apply_to(&mut dish);
        let dish = self.store.save_dish(dish).await?;

        let view = DishResponse::from(&dish);
        self.cache.dish_updated(restaurant_id, &view).await;
        info!(%restaurant_id, %dish_id, "Dish updated");
        Ok(view)
    }

    /// Deletes the dish and returns its last state.
    pub async fn delete(&self, restaurant_id: Uuid, dish_id: Uuid) -> Result<DishResponse> {
        let service = self.clone();
        run_detached(async move { service.commit_delete(restaurant_id, dish_id).await }).await
    }

    async fn commit_delete(&self, restaurant_id: Uuid, dish_id: Uuid) -> Result<DishResponse> {
        let _guard = self.locks.lock(restaurant_id).await;
        let restaurant = self.validator.get_restaurant_or_fail(restaurant_id).await?;
        let dish = get_dish_in_restaurant_or_fail(&restaurant, dish_id)?;

        self.store.delete_dish(dish.id).await?;

        self.cache.dish_deleted(restaurant_id, dish_id).await;
        info!(%restaurant_id, %dish_id, "Dish deleted");
        Ok(DishResponse::from(dish))
    }
}
