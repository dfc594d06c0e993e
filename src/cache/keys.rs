//! Cache Keys
//!
//! Regions partition the cache; within a region, entries are keyed by one
//! identifier or by a (parent, child) pair of identifiers.

use std::fmt;

use uuid::Uuid;

// == Cache Region ==
/// A named partition of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheRegion {
    /// Single-dish entries and whole-menu entries
    Dishes,
    /// Restaurant views
    Restaurants,
}

impl CacheRegion {
    pub fn name(&self) -> &'static str {
        match self {
            CacheRegion::Dishes => "dishes",
            CacheRegion::Restaurants => "restaurants",
        }
    }
}

impl fmt::Display for CacheRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// == Cache Key ==
/// Key of an entry inside a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Keyed by a single id, e.g. `restaurants[r]` or the menu `dishes[r]`
    Id(Uuid),
    /// Keyed by a parent and child id, e.g. `dishes[(r, d)]`
    Pair(Uuid, Uuid),
}

impl CacheKey {
    /// The restaurant a key belongs to; the first component in both shapes.
    pub fn owner(&self) -> Uuid {
        match self {
            CacheKey::Id(id) | CacheKey::Pair(id, _) => *id,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Id(id) => write!(f, "{}", id),
            CacheKey::Pair(a, b) => write!(f, "({}, {})", a, b),
        }
    }
}

/// Fully qualified entry address: region plus key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionKey {
    pub region: CacheRegion,
    pub key: CacheKey,
}

impl RegionKey {
    pub fn new(region: CacheRegion, key: CacheKey) -> Self {
        Self { region, key }
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.region, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_and_dish_keys_are_distinct() {
        let restaurant = Uuid::new_v4();
        let dish = Uuid::new_v4();
        let menu = RegionKey::new(CacheRegion::Dishes, CacheKey::Id(restaurant));
        let single = RegionKey::new(CacheRegion::Dishes, CacheKey::Pair(restaurant, dish));
        assert_ne!(menu, single);
        assert_eq!(menu.key.owner(), single.key.owner());
    }

    #[test]
    fn test_same_key_in_different_regions_is_distinct() {
        let id = Uuid::new_v4();
        let menu = RegionKey::new(CacheRegion::Dishes, CacheKey::Id(id));
        let restaurant = RegionKey::new(CacheRegion::Restaurants, CacheKey::Id(id));
        assert_ne!(menu, restaurant);
    }

    #[test]
    fn test_display() {
        let key = RegionKey::new(CacheRegion::Restaurants, CacheKey::Id(Uuid::nil()));
        assert_eq!(
            key.to_string(),
            "restaurants[00000000-0000-0000-0000-000000000000]"
        );
    }
}
