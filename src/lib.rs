//! Restaurant Catalog - cities, restaurants and their menus over HTTP
//!
//! Reads are served from a region-keyed cache kept coherent with the entity
//! store by an explicit invalidation protocol.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
