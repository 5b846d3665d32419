//! Cached values and their expiration.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use docucache_interface::ResultSet;
use serde::{Deserialize, Serialize};

/// Cache entry with value and expiration.
///
/// Entries are never modified after creation; a refresh replaces the whole
/// entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct CacheEntry {
    value: ResultSet,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry that stays valid until `expires_at`.
    pub fn new(value: ResultSet, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    /// Valid iff `now < expires_at`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Check if this entry is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_valid_at(now)
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        if self.is_expired_at(now) {
            return None;
        }
        (self.expires_at - now).to_std().ok()
    }
}
