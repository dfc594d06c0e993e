//! Per-restaurant write serialization.
//!
//! Every mutation touching a restaurant or its dishes holds that
//! restaurant's lock from validation until its cache effects are applied,
//! so store commit order and cache write order agree. Locks are striped:
//! unrelated restaurants may share a stripe, which only costs concurrency.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const DEFAULT_STRIPES: usize = 64;

pub struct WriteLocks {
    stripes: Vec<Mutex<()>>,
}

impl WriteLocks {
    pub fn new(stripes: usize) -> Self {
        let stripes = stripes.max(1);
        Self {
            stripes: (0..stripes).map(|_| Mutex::new(())).collect(),
        }
    }

    pub async fn lock(&self, restaurant_id: Uuid) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe(restaurant_id)].lock().await
    }

    fn stripe(&self, restaurant_id: Uuid) -> usize {
        let mut hasher = DefaultHasher::new();
        restaurant_id.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }
}

impl Default for WriteLocks {
    fn default() -> Self {
        Self::new(DEFAULT_STRIPES)
    }
}
