//! Per-user profile cache with a fixed time-to-live.
//!
//! DESIGN
//! ======
//! One slot per user under `{prefix}{user_id}`, holding the profile plus the
//! write time and absolute expiry. Reads evict expired or undecodable slots.
//! Eviction without a user id sweeps every key in the namespace and nothing
//! outside it.
//!
//! Time is passed in by the caller so the store's injected clock drives
//! expiry.

#[cfg(test)]
#[path = "profile_cache_test.rs"]
mod profile_cache_test;

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::net::types::Profile;
use crate::util::storage::{KeyValueStore, remove_prefixed, save_json};

/// Persisted slot layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedProfile {
    pub user: Profile,
    /// Write time, ms since epoch.
    pub timestamp: i64,
    /// Expiry, ms since epoch.
    pub expires: i64,
}

pub struct ProfileCache {
    storage: Rc<dyn KeyValueStore>,
    prefix: String,
    ttl_ms: i64,
}

impl ProfileCache {
    #[must_use]
    pub fn new(storage: Rc<dyn KeyValueStore>, prefix: impl Into<String>, ttl_ms: i64) -> Self {
        Self { storage, prefix: prefix.into(), ttl_ms }
    }

    #[must_use]
    pub fn key_for(&self, user_id: &str) -> String {
        format!("{}{user_id}", self.prefix)
    }

    /// Fresh profile for `user_id` at `now_ms`, evicting the slot if stale.
    pub fn read_at(&self, user_id: &str, now_ms: i64) -> Option<Profile> {
        let key = self.key_for(user_id);
        let raw = self.storage.get(&key)?;
        match serde_json::from_str::<CachedProfile>(&raw) {
            Ok(slot) if now_ms < slot.expires => Some(slot.user),
            Ok(_) => {
                log::debug!("profile cache slot expired for {user_id}");
                self.storage.remove(&key);
                None
            }
            Err(e) => {
                log::warn!("dropping unreadable profile cache slot for {user_id}: {e}");
                self.storage.remove(&key);
                None
            }
        }
    }

    pub fn write_at(&self, user_id: &str, profile: &Profile, now_ms: i64) {
        let slot = CachedProfile { user: profile.clone(), timestamp: now_ms, expires: now_ms.saturating_add(self.ttl_ms) };
        save_json(&*self.storage, &self.key_for(user_id), &slot);
    }

    /// Remove one user's slot, or every slot in the namespace for `None`.
    pub fn evict(&self, user_id: Option<&str>) {
        match user_id {
            Some(id) => self.storage.remove(&self.key_for(id)),
            None => {
                let removed = remove_prefixed(&*self.storage, &self.prefix);
                log::debug!("swept {removed} profile cache slots");
            }
        }
    }
}
