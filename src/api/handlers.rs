//! API Handlers
//!
//! HTTP request handlers. Each one extracts its inputs and delegates to the
//! catalog services; all ordering of validation, store writes and cache
//! effects lives there.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::cache::{CacheBackend, CatalogCache};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    CityResponse, CreateCityRequest, CreateDishRequest, CreateRestaurantRequest, DishResponse,
    HealthResponse, PageParams, PageResponse, RestaurantMenu, RestaurantResponse, StatsResponse,
    UpdateCityRequest, UpdateDishRequest, UpdateRestaurantRequest,
};
use crate::store::{EntityStore, PageRequest};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub cache: Arc<CatalogCache>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the catalog over the given store and cache backend.
    pub fn new(
        store: Arc<dyn EntityStore>,
        backend: Arc<dyn CacheBackend>,
        config: &Config,
    ) -> Self {
        let cache = Arc::new(CatalogCache::new(backend));
        Self {
            catalog: Catalog::new(store, cache.clone()),
            cache,
            config: Arc::new(config.clone()),
        }
    }

    fn page_request(&self, params: PageParams) -> Result<PageRequest> {
        let size = params.size.unwrap_or(self.config.default_page_size);
        if size == 0 || size > self.config.max_page_size {
            return Err(ApiError::InvalidRequest(format!(
                "Page size must be between 1 and {}",
                self.config.max_page_size
            )));
        }
        Ok(PageRequest::new(params.page.unwrap_or(0), size))
    }
}

// == Health & Stats ==

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    state
        .cache
        .stats()
        .await
        .map(|stats| Json(StatsResponse::from(stats)))
        .ok_or_else(|| ApiError::Unavailable("cache statistics".to_string()))
}

// == Cities ==

pub async fn list_cities(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PageResponse<CityResponse>>> {
    let request = state.page_request(params)?;
    Ok(Json(state.catalog.cities.list(request).await?))
}

pub async fn create_city(
    State(state): State<AppState>,
    Json(req): Json<CreateCityRequest>,
) -> Result<(StatusCode, Json<CityResponse>)> {
    let city = state.catalog.cities.create(req).await?;
    Ok((StatusCode::CREATED, Json(city)))
}

pub async fn get_city(
    State(state): State<AppState>,
    Path(city_id): Path<Uuid>,
) -> Result<Json<CityResponse>> {
    Ok(Json(state.catalog.cities.get(city_id).await?))
}

pub async fn update_city(
    State(state): State<AppState>,
    Path(city_id): Path<Uuid>,
    Json(req): Json<UpdateCityRequest>,
) -> Result<Json<CityResponse>> {
    Ok(Json(state.catalog.cities.update(city_id, req).await?))
}

pub async fn delete_city(
    State(state): State<AppState>,
    Path(city_id): Path<Uuid>,
) -> Result<Json<CityResponse>> {
    Ok(Json(state.catalog.cities.delete(city_id).await?))
}

// == Restaurants ==

pub async fn list_restaurants(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PageResponse<RestaurantResponse>>> {
    let request = state.page_request(params)?;
    Ok(Json(state.catalog.restaurants.list(request).await?))
}

pub async fn create_restaurant(
    State(state): State<AppState>,
    Json(req): Json<CreateRestaurantRequest>,
) -> Result<(StatusCode, Json<RestaurantResponse>)> {
    let restaurant = state.catalog.restaurants.create(req).await?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<RestaurantResponse>> {
    Ok(Json(state.catalog.restaurants.get(restaurant_id).await?))
}

pub async fn update_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
    Json(req): Json<UpdateRestaurantRequest>,
) -> Result<Json<RestaurantResponse>> {
    Ok(Json(
        state.catalog.restaurants.update(restaurant_id, req).await?,
    ))
}

pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<RestaurantResponse>> {
    Ok(Json(state.catalog.restaurants.delete(restaurant_id).await?))
}

// == Dishes ==

pub async fn get_menu(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<RestaurantMenu>> {
    Ok(Json(state.catalog.dishes.menu(restaurant_id).await?))
}

pub async fn create_dish(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
    Json(req): Json<CreateDishRequest>,
) -> Result<(StatusCode, Json<DishResponse>)> {
    let dish = state.catalog.dishes.create(restaurant_id, req).await?;
    Ok((StatusCode::CREATED, Json(dish)))
}

pub async fn get_dish(
    State(state): State<AppState>,
    Path((restaurant_id, dish_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DishResponse>> {
    Ok(Json(state.catalog.dishes.get(restaurant_id, dish_id).await?))
}

pub async fn update_dish(
    State(state): State<AppState>,
    Path((restaurant_id, dish_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateDishRequest>,
) -> Result<Json<DishResponse>> {
    Ok(Json(
        state
            .catalog
            .dishes
            .update(restaurant_id, dish_id, req)
            .await?,
    ))
}

pub async fn delete_dish(
    State(state): State<AppState>,
    Path((restaurant_id, dish_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DishResponse>> {
    Ok(Json(
        state.catalog.dishes.delete(restaurant_id, dish_id).await?,
    ))
}
