//! Request DTOs for the catalog API
//!
//! Defines the structure of incoming HTTP request bodies and query strings,
//! their validation, and their mapping onto domain entities. Update requests
//! merge only the fields that are present.

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{City, Dish, Restaurant};

fn check_name(field: &str, name: &str) -> Option<String> {
    if name.trim().is_empty() {
        Some(format!("{} cannot be blank", field))
    } else {
        None
    }
}

fn check_price(price: f64) -> Option<String> {
    if !price.is_finite() || price < 0.0 {
        Some("Price must be a non-negative number".to_string())
    } else {
        None
    }
}

// == Cities ==
/// Request body for POST /api/cities
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCityRequest {
    pub name: String,
}

impl CreateCityRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        check_name("Name", &self.name)
    }

    pub fn into_city(self) -> City {
        City::new(self.name)
    }
}

/// Request body for PUT /api/cities/:city_id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCityRequest {
    #[serde(default)]
    pub name: Option<String>,
}

impl UpdateCityRequest {
    pub fn validate(&self) -> Option<String> {
        self.name.as_deref().and_then(|name| check_name("Name", name))
    }

    pub fn apply_to(self, city: &mut City) {
        if let Some(name) = self.name {
            city.name = name;
        }
    }
}

// == Restaurants ==
/// Request body for POST /api/restaurants
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub city_id: Uuid,
}

impl CreateRestaurantRequest {
    pub fn validate(&self) -> Option<String> {
        check_name("Name", &self.name)
    }

    /// The id and dish list are never taken from the request.
    pub fn into_restaurant(self) -> Restaurant {
        Restaurant::new(self.name, self.city_id)
    }
}

/// Request body for PUT /api/restaurants/:restaurant_id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRestaurantRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city_id: Option<Uuid>,
}

impl UpdateRestaurantRequest {
    pub fn validate(&self) -> Option<String> {
        self.name.as_deref().and_then(|name| check_name("Name", name))
    }

    pub fn apply_to(self, restaurant: &mut Restaurant) {
        if let Some(name) = self.name {
            restaurant.name = name;
        }
        if let Some(city_id) = self.city_id {
            restaurant.city_id = city_id;
        }
    }
}

// == Dishes ==
/// Request body for POST /api/restaurants/:restaurant_id/dishes
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDishRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
}

impl CreateDishRequest {
    pub fn validate(&self) -> Option<String> {
        check_name("Name", &self.name).or_else(|| check_price(self.price))
    }

    pub fn into_dish(self) -> Dish {
        Dish::new(self.name, self.description, self.price)
    }
}

/// Request body for PUT /api/restaurants/:restaurant_id/dishes/:dish_id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDishRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl UpdateDishRequest {
    pub fn validate(&self) -> Option<String> {
        self.name
            .as_deref()
            .and_then(|name| check_name("Name", name))
            .or_else(|| self.price.and_then(check_price))
    }

    /// Merges present fields into `dish`; its id never changes.
    pub fn apply_to(self, dish: &mut Dish) {
        if let Some(name) = self.name {
            dish.name = name;
        }
        if let Some(description) = self.description {
            dish.description = Some(description);
        }
        if let Some(price) = self.price {
            dish.price = price;
        }
    }
}

// == Paging ==
/// Query string for list endpoints: `?page=0&size=20`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub size: Option<usize>,
}
