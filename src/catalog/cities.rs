//! City operations. Cities are not cached.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::catalog::validation::Validator;
use crate::error::{ApiError, Result};
use crate::models::{CityResponse, CreateCityRequest, PageResponse, UpdateCityRequest};
use crate::store::{EntityStore, PageRequest};

#[derive(Clone)]
pub struct CityService {
    store: Arc<dyn EntityStore>,
    validator: Validator,
}

impl CityService {
    pub fn new(store: Arc<dyn EntityStore>, validator: Validator) -> Self {
        Self { store, validator }
    }

    pub async fn list(&self, request: PageRequest) -> Result<PageResponse<CityResponse>> {
        let page = self.store.find_cities(request).await?;
        Ok(PageResponse::from_page(page, |city| CityResponse::from(city)))
    }

    pub async fn get(&self, city_id: Uuid) -> Result<CityResponse> {
        let city = self.validator.get_city_or_fail(city_id).await?;
        Ok(CityResponse::from(&city))
    }

    pub async fn create(&self, request: CreateCityRequest) -> Result<CityResponse> {
        if let Some(message) = request.validate() {
            return Err(ApiError::InvalidRequest(message));
        }
        let city = self.store.save_city(request.into_city()).await?;
        info!(city_id = %city.id, "City created");
        Ok(CityResponse::from(&city))
    }

    pub async fn update(&self, city_id: Uuid, request: UpdateCityRequest) -> Result<CityResponse> {
        if let Some(message) = request.validate() {
            return Err(ApiError::InvalidRequest(message));
        }
        let mut city = self.validator.get_city_or_fail(city_id).await?;
        request.apply_to(&mut city);
        let city = self.store.save_city(city).await?;
        info!(%city_id, "City updated");
        Ok(CityResponse::from(&city))
    }

    /// Deletes the city only; restaurants referencing it are left in place.
    pub async fn delete(&self, city_id: Uuid) -> Result<CityResponse> {
        let city = self.validator.get_city_or_fail(city_id).await?;
        self.store.delete_city(city_id).await?;
        info!(%city_id, "City deleted");
        Ok(CityResponse::from(&city))
    }
}
