//! Fill Fence
//!
//! Keeps read-through populates from resurrecting data an invalidation has
//! already evicted. A reader takes a `FillTicket` before its store read; an
//! invalidation bumps the generation of the restaurant's slot. A populate is
//! kept only if the generation is unchanged both before and after the backend
//! write, otherwise the populated entry is evicted again.
//!
//! A slot exists only while at least one ticket for that restaurant is
//! outstanding, so the fence holds state for in-flight reads and nothing
//! else. Slots are striped; no lock is held across an await.

use std::collections::hash_map::{DefaultHasher, Entry};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

const DEFAULT_STRIPES: usize = 64;

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    /// Outstanding tickets
    readers: usize,
}

#[derive(Debug)]
pub struct FillFence {
    stripes: Vec<Mutex<HashMap<Uuid, Slot>>>,
}

impl FillFence {
    pub fn new(stripes: usize) -> Self {
        let stripes = stripes.max(1);
        Self {
            stripes: (0..stripes).map(|_| Mutex::new(HashMap::new())).collect(),
        }
    }

    /// Registers a reader of `restaurant_id`. The slot is released when the
    /// ticket is dropped.
    pub fn ticket(&self, restaurant_id: Uuid) -> FillTicket<'_> {
        let mut slots = self.slots(restaurant_id);
        let slot = slots.entry(restaurant_id).or_default();
        slot.readers += 1;
        FillTicket {
            fence: self,
            restaurant_id,
            issued: slot.generation,
        }
    }

    /// Marks every outstanding ticket of `restaurant_id` as stale.
    pub fn invalidate(&self, restaurant_id: Uuid) {
        if let Some(slot) = self.slots(restaurant_id).get_mut(&restaurant_id) {
            slot.generation += 1;
        }
    }

    /// Number of restaurants with outstanding tickets.
    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.stripes
            .iter()
            .map(|stripe| stripe.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    fn is_current(&self, ticket: &FillTicket<'_>) -> bool {
        self.slots(ticket.restaurant_id)
            .get(&ticket.restaurant_id)
            .is_some_and(|slot| slot.generation == ticket.issued)
    }

    fn release(&self, restaurant_id: Uuid) {
        let mut slots = self.slots(restaurant_id);
        if let Entry::Occupied(mut entry) = slots.entry(restaurant_id) {
            let slot = entry.get_mut();
            slot.readers = slot.readers.saturating_sub(1);
            if slot.readers == 0 {
                entry.remove();
            }
        }
    }

    fn slots(&self, restaurant_id: Uuid) -> MutexGuard<'_, HashMap<Uuid, Slot>> {
        let mut hasher = DefaultHasher::new();
        restaurant_id.hash(&mut hasher);
        let index = (hasher.finish() % self.stripes.len() as u64) as usize;
        // the maps hold plain counters, a panicked holder leaves them usable
        self.stripes[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FillFence {
    fn default() -> Self {
        Self::new(DEFAULT_STRIPES)
    }
}

/// Permission to populate entries of one restaurant, taken before the store
/// read whose result will be cached.
#[derive(Debug)]
pub struct FillTicket<'a> {
    fence: &'a FillFence,
    restaurant_id: Uuid,
    issued: u64,
}

impl FillTicket<'_> {
    pub fn restaurant_id(&self) -> Uuid {
        self.restaurant_id
    }

    /// False once the restaurant has been invalidated since the ticket was
    /// issued.
    pub fn is_current(&self) -> bool {
        self.fence.is_current(self)
    }
}

impl Drop for FillTicket<'_> {
    fn drop(&mut self) {
        self.fence.release(self.restaurant_id);
    }
}
