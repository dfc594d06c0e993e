//! Response DTOs for the catalog API
//!
//! Defines the structure of outgoing HTTP response bodies. Dish, menu and
//! restaurant views are also what the cache stores, so they round-trip
//! through serde.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cache::CacheStats;
use crate::domain::{City, Dish, Restaurant};
use crate::store::Page;

/// A single dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

impl From<&Dish> for DishResponse {
    fn from(dish: &Dish) -> Self {
        Self {
            id: dish.id,
            name: dish.name.clone(),
            description: dish.description.clone(),
            price: dish.price,
        }
    }
}

/// All dishes of a restaurant, in menu order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantMenu {
    pub dishes: Vec<DishResponse>,
}

impl From<&Restaurant> for RestaurantMenu {
    fn from(restaurant: &Restaurant) -> Self {
        Self {
            dishes: restaurant.dishes.iter().map(DishResponse::from).collect(),
        }
    }
}

/// A restaurant with its dishes embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantResponse {
    pub id: Uuid,
    pub name: String,
    pub city_id: Uuid,
    pub dishes: Vec<DishResponse>,
}

impl From<&Restaurant> for RestaurantResponse {
    fn from(restaurant: &Restaurant) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name.clone(),
            city_id: restaurant.city_id,
            dishes: restaurant.dishes.iter().map(DishResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<&City> for CityResponse {
    fn from(city: &City) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl<T> PageResponse<T> {
    /// Converts a store page, mapping each item to its view.
    pub fn from_page<E>(page: Page<E>, view: impl Fn(&E) -> T) -> Self {
        let total_pages = page.total_pages();
        Self {
            content: page.items.iter().map(view).collect(),
            page: page.request.page,
            size: page.request.size,
            total_elements: page.total,
            total_pages,
        }
    }
}

/// Response body for GET /api/cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub puts: u64,
    pub invalidations: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            puts: stats.puts,
            invalidations: stats.invalidations,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PageRequest;

    #[test]
    fn test_restaurant_response_embeds_dishes() {
        let mut restaurant = Restaurant::new("Trattoria", Uuid::new_v4());
        restaurant.dishes.push(Dish::new("Pasta", None, 12.0));

        let view = RestaurantResponse::from(&restaurant);
        assert_eq!(view.dishes.len(), 1);
        assert_eq!(view.dishes[0].name, "Pasta");
        assert_eq!(view.city_id, restaurant.city_id);
    }

    #[test]
    fn test_menu_serializes_under_dishes_key() {
        let menu = RestaurantMenu { dishes: vec![] };
        let json = serde_json::to_value(&menu).unwrap();
        assert!(json["dishes"].is_array());
    }

    #[test]
    fn test_page_response_totals() {
        let cities = vec![City::new("A"), City::new("B"), City::new("C")];
        let page = Page::slice(cities, PageRequest::new(0, 2));
        let response = PageResponse::from_page(page, |city| CityResponse::from(city));

        assert_eq!(response.content.len(), 2);
        assert_eq!(response.total_elements, 3);
        assert_eq!(response.total_pages, 2);
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..CacheStats::default()
        };
        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
