//! API Module
//!
//! HTTP handlers and routing for the catalog REST API.
//!
//! # Endpoints
//! - `GET /health` - Health check
//! - `GET /api/cache/stats` - Cache statistics
//! - `GET|POST /api/cities`, `GET|PUT|DELETE /api/cities/:city_id`
//! - `GET|POST /api/restaurants`, `GET|PUT|DELETE /api/restaurants/:restaurant_id`
//! - `GET|POST /api/restaurants/:restaurant_id/dishes` - Menu / new dish
//! - `GET|PUT|DELETE /api/restaurants/:restaurant_id/dishes/:dish_id`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
