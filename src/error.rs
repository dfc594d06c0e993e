//! Error types for the catalog service
//!
//! Provides unified error handling using thiserror. `ApiError` is what
//! handlers return; `CacheError` never leaves the cache layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::domain::EntityKind;
use crate::store::StoreError;

// == API Error Enum ==
/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A city, restaurant or dish does not exist
    #[error("{kind} with id '{id}' not found")]
    NotFound { kind: EntityKind, id: Uuid },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The entity store failed; fatal to the request
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// An auxiliary component (e.g. cache statistics) cannot answer
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn not_found(kind: EntityKind, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(err) => {
                error!(error = %err, "Entity store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Cache Error Enum ==
/// Failures inside the cache layer. Callers downgrade these to misses.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key has expired
    #[error("Key expired: {0}")]
    Expired(String),

    /// Value exceeds the per-entry size limit
    #[error("Value too large: {0}")]
    ValueTooLarge(String),

    /// Cache is full and eviction failed
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// The cache backend could not be reached
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

// == Result Type Aliases ==
/// Convenience Result type for request handling.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
