//! In-memory Entity Store
//!
//! Hash maps behind a tokio `RwLock`. Every record carries the sequence
//! number of its first insertion so paged scans come back in creation order.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EntityStore, Page, PageRequest, StoreResult};
use crate::domain::{City, Dish, Restaurant};

// == Records ==
#[derive(Debug, Clone)]
struct Stored<T> {
    seq: u64,
    value: T,
}

/// Restaurant as persisted: dishes are referenced, not embedded.
#[derive(Debug, Clone)]
struct RestaurantRecord {
    id: Uuid,
    name: String,
    city_id: Uuid,
    dish_ids: Vec<Uuid>,
}

#[derive(Debug, Default)]
struct Tables {
    next_seq: u64,
    cities: HashMap<Uuid, Stored<City>>,
    restaurants: HashMap<Uuid, Stored<RestaurantRecord>>,
    dishes: HashMap<Uuid, Stored<Dish>>,
}

impl Tables {
    fn upsert<T>(next_seq: &mut u64, table: &mut HashMap<Uuid, Stored<T>>, id: Uuid, value: T) {
        match table.get_mut(&id) {
            Some(stored) => stored.value = value,
            None => {
                *next_seq += 1;
                table.insert(
                    id,
                    Stored {
                        seq: *next_seq,
                        value,
                    },
                );
            }
        }
    }

    fn hydrate(&self, record: &RestaurantRecord) -> Restaurant {
        let dishes = record
            .dish_ids
            .iter()
            .filter_map(|id| self.dishes.get(id))
            .map(|stored| stored.value.clone())
            .collect();
        Restaurant {
            id: record.id,
            name: record.name.clone(),
            city_id: record.city_id,
            dishes,
        }
    }
}

/// Returns table values ordered by insertion.
fn ordered<T: Clone>(table: &HashMap<Uuid, Stored<T>>) -> Vec<T> {
    let mut rows: Vec<&Stored<T>> = table.values().collect();
    rows.sort_by_key(|stored| stored.seq);
    rows.into_iter().map(|stored| stored.value.clone()).collect()
}

// == Memory Entity Store ==
/// Process-local `EntityStore`.
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    tables: RwLock<Tables>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn get_city(&self, id: Uuid) -> StoreResult<Option<City>> {
        let tables = self.tables.read().await;
        Ok(tables.cities.get(&id).map(|stored| stored.value.clone()))
    }

    async fn save_city(&self, city: City) -> StoreResult<City> {
        let mut tables = self.tables.write().await;
        let Tables {
            next_seq, cities, ..
        } = &mut *tables;
        Tables::upsert(next_seq, cities, city.id, city.clone());
        Ok(city)
    }

    async fn delete_city(&self, id: Uuid) -> StoreResult<()> {
        self.tables.write().await.cities.remove(&id);
        Ok(())
    }

    async fn find_cities(&self, request: PageRequest) -> StoreResult<Page<City>> {
        let tables = self.tables.read().await;
        Ok(Page::slice(ordered(&tables.cities), request))
    }

    async fn get_restaurant(&self, id: Uuid) -> StoreResult<Option<Restaurant>> {
        let tables = self.tables.read().await;
        Ok(tables
            .restaurants
            .get(&id)
            .map(|stored| tables.hydrate(&stored.value)))
    }

    async fn save_restaurant(&self, restaurant: Restaurant) -> StoreResult<Restaurant> {
        let mut tables = self.tables.write().await;
        let Tables {
            next_seq,
            restaurants,
            dishes,
            ..
        } = &mut *tables;

        for dish in &restaurant.dishes {
            Tables::upsert(next_seq, dishes, dish.id, dish.clone());
        }
        let record = RestaurantRecord {
            id: restaurant.id,
            name: restaurant.name.clone(),
            city_id: restaurant.city_id,
            dish_ids: restaurant.dish_ids(),
        };
        Tables::upsert(next_seq, restaurants, restaurant.id, record);
        Ok(restaurant)
    }

    async fn delete_restaurant(&self, id: Uuid) -> StoreResult<()> {
        self.tables.write().await.restaurants.remove(&id);
        Ok(())
    }

    async fn find_restaurants(&self, request: PageRequest) -> StoreResult<Page<Restaurant>> {
        let tables = self.tables.read().await;
        let records = ordered(&tables.restaurants);
        let page = Page::slice(records, request);
        Ok(page.map(|record| tables.hydrate(&record)))
    }

    async fn get_dish(&self, id: Uuid) -> StoreResult<Option<Dish>> {
        let tables = self.tables.read().await;
        Ok(tables.dishes.get(&id).map(|stored| stored.value.clone()))
    }

    async fn save_dish(&self, dish: Dish) -> StoreResult<Dish> {
        let mut tables = self.tables.write().await;
        let Tables {
            next_seq, dishes, ..
        } = &mut *tables;
        Tables::upsert(next_seq, dishes, dish.id, dish.clone());
        Ok(dish)
    }

    async fn delete_dish(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.dishes.remove(&id).is_some() {
            for stored in tables.restaurants.values_mut() {
                stored.value.dish_ids.retain(|dish_id| *dish_id != id);
            }
        }
        Ok(())
    }
}
