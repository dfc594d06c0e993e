//! Entity Store Module
//!
//! Durable storage for cities, restaurants and dishes, addressed by id.
//! The store is the source of truth; the cache layer is always rebuilt from it.

mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{City, Dish, Restaurant};

pub use memory::MemoryEntityStore;

// == Store Error ==
/// Failures of the backing store. Fatal to the request, never retried here.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// The store cannot serve requests right now
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Paging ==
/// A zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// A bounded, ordered slice of a collection plus the collection's size.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub request: PageRequest,
}

impl<T> Page<T> {
    /// Builds a page out of an already ordered collection.
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .collect();
        Self {
            items,
            total,
            request,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    /// Number of pages needed for `total` items.
    pub fn total_pages(&self) -> usize {
        if self.request.size == 0 {
            0
        } else {
            self.total.div_ceil(self.request.size)
        }
    }
}

// == Entity Store Trait ==
/// Storage contract for catalog aggregates.
///
/// `save_*` is an upsert. `get_restaurant` returns the aggregate with its
/// dishes loaded in menu order; `save_restaurant` persists the dish list
/// (saving the contained dishes as well). `delete_dish` also detaches the
/// dish from whichever restaurant lists it.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_city(&self, id: Uuid) -> StoreResult<Option<City>>;
    async fn save_city(&self, city: City) -> StoreResult<City>;
    async fn delete_city(&self, id: Uuid) -> StoreResult<()>;
    async fn find_cities(&self, request: PageRequest) -> StoreResult<Page<City>>;

    async fn get_restaurant(&self, id: Uuid) -> StoreResult<Option<Restaurant>>;
    async fn save_restaurant(&self, restaurant: Restaurant) -> StoreResult<Restaurant>;
    async fn delete_restaurant(&self, id: Uuid) -> StoreResult<()>;
    async fn find_restaurants(&self, request: PageRequest) -> StoreResult<Page<Restaurant>>;

    async fn get_dish(&self, id: Uuid) -> StoreResult<Option<Dish>>;
    async fn save_dish(&self, dish: Dish) -> StoreResult<Dish>;
    async fn delete_dish(&self, id: Uuid) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_slice_middle() {
        let page = Page::slice((0..10).collect(), PageRequest::new(1, 4));
        assert_eq!(page.items, vec![4, 5, 6, 7]);
        assert_eq!(page.total, 10);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_page_slice_past_end() {
        let page = Page::slice((0..3).collect::<Vec<i32>>(), PageRequest::new(5, 2));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_page_map_keeps_totals() {
        let page = Page::slice(vec![1, 2, 3], PageRequest::new(0, 2)).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(), 2);
    }
}
