//! Catalog Module
//!
//! Per-request orchestration of validation, store writes and cache effects
//! for cities, restaurants and dishes.

mod cities;
mod dishes;
mod locks;
mod restaurants;
pub mod validation;

use std::future::Future;
use std::sync::Arc;

use crate::cache::CatalogCache;
use crate::error::{ApiError, Result};
use crate::store::EntityStore;

pub use cities::CityService;
pub use dishes::DishService;
pub use locks::WriteLocks;
pub use restaurants::RestaurantService;
pub use validation::{get_dish_in_restaurant_or_fail, Validator};

/// All catalog services, wired over one store and one cache.
#[derive(Clone)]
pub struct Catalog {
    pub cities: CityService,
    pub restaurants: RestaurantService,
    pub dishes: DishService,
}

impl Catalog {
    pub fn new(store: Arc<dyn EntityStore>, cache: Arc<CatalogCache>) -> Self {
        let validator = Validator::new(store.clone());
        let locks = Arc::new(WriteLocks::default());
        Self {
            cities: CityService::new(store.clone(), validator.clone()),
            restaurants: RestaurantService::new(
                store.clone(),
                validator.clone(),
                cache.clone(),
                locks.clone(),
            ),
            dishes: DishService::new(store, validator, cache, locks),
        }
    }
}

/// Runs a store write and its cache effects on their own task. Dropping the
/// returned future does not cancel the mutation once it has been spawned.
pub(crate) async fn run_detached<F, T>(mutation: F) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(mutation).await {
        Ok(result) => result,
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(err) => Err(ApiError::Unavailable(format!("mutation task: {err}"))),
    }
}
