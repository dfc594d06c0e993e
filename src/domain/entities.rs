//! Catalog Entities
//!
//! Restaurant is the aggregate root for its dishes: a dish is only ever
//! reached through the restaurant that owns it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// == Entity Kind ==
/// The kind of catalog entity, used in not-found errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    City,
    Restaurant,
    Dish,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::City => "City",
            EntityKind::Restaurant => "Restaurant",
            EntityKind::Dish => "Dish",
        };
        f.write_str(name)
    }
}

// == City ==
/// A city. Restaurants reference it by id; it does not own their lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: Uuid,
    pub name: String,
}

impl City {
    /// Creates a city with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

// == Dish ==
/// A dish on exactly one restaurant's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

impl Dish {
    /// Creates a dish with a freshly generated id.
    pub fn new(name: impl Into<String>, description: Option<String>, price: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            price,
        }
    }
}

// == Restaurant ==
/// A restaurant in a city, owning an insertion-ordered list of dishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub city_id: Uuid,
    pub dishes: Vec<Dish>,
}

impl Restaurant {
    /// Creates a restaurant with no dishes and a freshly generated id.
    pub fn new(name: impl Into<String>, city_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            city_id,
            dishes: Vec::new(),
        }
    }

    /// Ids of the owned dishes, in menu order.
    pub fn dish_ids(&self) -> Vec<Uuid> {
        self.dishes.iter().map(|dish| dish.id).collect()
    }
}
