//! Validation Layer
//!
//! Fetch-or-fail lookups. A dish is only ever found through the restaurant
//! that owns it: there is no cross-restaurant index.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{City, Dish, EntityKind, Restaurant};
use crate::error::{ApiError, Result};
use crate::store::EntityStore;

#[derive(Clone)]
pub struct Validator {
    store: Arc<dyn EntityStore>,
}

impl Validator {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn get_city_or_fail(&self, city_id: Uuid) -> Result<City> {
        self.store
            .get_city(city_id)
            .await?
            .ok_or_else(|| ApiError::not_found(EntityKind::City, city_id))
    }

    pub async fn get_restaurant_or_fail(&self, restaurant_id: Uuid) -> Result<Restaurant> {
        self.store
            .get_restaurant(restaurant_id)
            .await?
            .ok_or_else(|| ApiError::not_found(EntityKind::Restaurant, restaurant_id))
    }
}

/// Finds `dish_id` in the restaurant's menu, scanning in menu order.
pub fn get_dish_in_restaurant_or_fail(restaurant: &Restaurant, dish_id: Uuid) -> Result<&Dish> {
    restaurant
        .dishes
        .iter()
        .find(|dish| dish.id == dish_id)
        .ok_or_else(|| ApiError::not_found(EntityKind::Dish, dish_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryEntityStore;
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_missing_city_is_not_found() {
        let validator = Validator::new(Arc::new(MemoryEntityStore::new()));
        let id = Uuid::new_v4();

        let err = validator.get_city_or_fail(id).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::NotFound { kind: EntityKind::City, id: missing } if missing == id
        ));
    }

    #[tokio::test]
    async fn test_existing_restaurant_is_returned_with_dishes() {
        let store = Arc::new(MemoryEntityStore::new());
        let mut restaurant = Restaurant::new("Noma", Uuid::new_v4());
        restaurant.dishes.push(Dish::new("Moss", None, 30.0));
        store.save_restaurant(restaurant.clone()).await.unwrap();
        let validator = Validator::new(store);

        let found = validator.get_restaurant_or_fail(restaurant.id).await.unwrap();
        assert_eq!(found, restaurant);
    }

    #[tokio::test]
    async fn test_missing_restaurant_is_not_found() {
        let validator = Validator::new(Arc::new(MemoryEntityStore::new()));
        let err = validator
            .get_restaurant_or_fail(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::NotFound {
                kind: EntityKind::Restaurant,
                ..
            }
        ));
    }

    #[test]
    fn test_dish_of_other_restaurant_is_not_found() {
        let mut mine = Restaurant::new("Mine", Uuid::new_v4());
        mine.dishes.push(Dish::new("Soup", None, 4.0));
        let mut theirs = Restaurant::new("Theirs", Uuid::new_v4());
        let foreign = Dish::new("Stew", None, 9.0);
        theirs.dishes.push(foreign.clone());

        let err = get_dish_in_restaurant_or_fail(&mine, foreign.id).unwrap_err();
        assert!(matches!(
            err,
            ApiError::NotFound { kind: EntityKind::Dish, id } if id == foreign.id
        ));
        assert!(get_dish_in_restaurant_or_fail(&theirs, foreign.id).is_ok());
    }

    proptest! {
        // Lookup succeeds exactly for the dishes the restaurant owns.
        #[test]
        fn prop_dish_lookup_matches_membership(
            owned in prop::collection::vec(any::<u128>(), 0..12),
            probe in any::<u128>(),
            pick_owned in any::<bool>()
        ) {
            let mut restaurant = Restaurant::new("R", Uuid::new_v4());
            for raw in &owned {
                let mut dish = Dish::new("d", None, 1.0);
                dish.id = Uuid::from_u128(*raw);
                restaurant.dishes.push(dish);
            }
            let target = match owned.first() {
                Some(first) if pick_owned => Uuid::from_u128(*first),
                _ => Uuid::from_u128(probe),
            };

            let is_member = restaurant.dishes.iter().any(|d| d.id == target);
            let found = get_dish_in_restaurant_or_fail(&restaurant, target);
            prop_assert_eq!(found.is_ok(), is_member);
            if let Ok(dish) = found {
                prop_assert_eq!(dish.id, target);
            }
        }
    }
}
