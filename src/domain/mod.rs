//! Domain Module
//!
//! Catalog entities: cities, restaurants and the dishes they own.

mod entities;

pub use entities::{City, Dish, EntityKind, Restaurant};
