//! API Routes
//!
//! Configures the Axum router with all catalog endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_city, create_dish, create_restaurant, delete_city, delete_dish, delete_restaurant,
    get_city, get_dish, get_menu, get_restaurant, health_handler, list_cities, list_restaurants,
    stats_handler, update_city, update_dish, update_restaurant, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/cache/stats", get(stats_handler))
        .route("/api/cities", get(list_cities).post(create_city))
        .route(
            "/api/cities/:city_id",
            get(get_city).put(update_city).delete(delete_city),
        )
        .route(
            "/api/restaurants",
            get(list_restaurants).post(create_restaurant),
        )
        .route(
            "/api/restaurants/:restaurant_id",
            get(get_restaurant)
                .put(update_restaurant)
                .delete(delete_restaurant),
        )
        .route(
            "/api/restaurants/:restaurant_id/dishes",
            get(get_menu).post(create_dish),
        )
        .route(
            "/api/restaurants/:restaurant_id/dishes/:dish_id",
            get(get_dish).put(update_dish).delete(delete_dish),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;
    use crate::config::Config;
    use crate::store::MemoryEntityStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let state = AppState::new(
            Arc::new(MemoryEntityStore::new()),
            Arc::new(InMemoryCache::new(100, None)),
            &Config::default(),
        );
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_restaurant_is_not_found() {
        let uri = format!("/api/restaurants/{}", uuid::Uuid::new_v4());
        let response = create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/restaurants/not-a-uuid/dishes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
