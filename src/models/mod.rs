//! Request and Response models for the catalog API
//!
//! DTOs for HTTP bodies, plus the hand-written conversions between them and
//! the domain entities.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    CreateCityRequest, CreateDishRequest, CreateRestaurantRequest, PageParams,
    UpdateCityRequest, UpdateDishRequest, UpdateRestaurantRequest,
};
pub use responses::{
    CityResponse, DishResponse, HealthResponse, PageResponse, RestaurantMenu,
    RestaurantResponse, StatsResponse,
};
