//! Cache Entry Module
//!
//! A serialized value plus the instant after which it must not be served.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value with an optional expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized view
    pub value: String,
    /// When the entry was stored
    pub stored_at: Instant,
    /// Expiry instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry that expires after `ttl`, if given.
    pub fn new(value: String, ttl: Option<Duration>) -> Self {
        let now = Instant::now();
        Self {
            value,
            stored_at: now,
            expires_at: ttl.map(|ttl| now + ttl),
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` reaches its expiry instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires| now >= expires)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let entry = CacheEntry::new("{}".to_string(), None);
        let far_future = Instant::now() + Duration::from_secs(365 * 24 * 3600);
        assert!(!entry.is_expired_at(far_future));
    }

    #[test]
    fn test_entry_with_ttl() {
        let entry = CacheEntry::new("{}".to_string(), Some(Duration::from_secs(60)));
        assert!(!entry.is_expired());
        assert!(entry.is_expired_at(entry.stored_at + Duration::from_secs(61)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("{}".to_string(), Some(Duration::from_secs(5)));
        let expires = entry.expires_at.unwrap();
        assert!(entry.is_expired_at(expires), "Entry should be expired at boundary");
        assert!(!entry.is_expired_at(expires - Duration::from_millis(1)));
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let entry = CacheEntry::new("{}".to_string(), Some(Duration::ZERO));
        assert!(entry.is_expired());
    }
}
