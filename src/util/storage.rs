//! Key/value persistence behind a small trait.
//!
//! SYSTEM CONTEXT
//! ==============
//! The profile cache and the auth provider persist JSON blobs. In the browser
//! that is `localStorage`; on the server and in tests it is an in-memory map.
//! Writes are best-effort: quota or privacy-mode failures are swallowed.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// String key/value store with prefix enumeration.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    /// All keys currently present.
    fn keys(&self) -> Vec<String>;
}

/// Load a JSON value for `key`. Missing and undecodable entries read as `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    serde_json::from_str(&raw).ok()
}

/// Save a JSON value for `key`.
pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let Ok(raw) = serde_json::to_string(value) else {
        return;
    };
    store.set(key, &raw);
}

/// Remove every key that starts with `prefix`. Returns how many were removed.
pub fn remove_prefixed(store: &dyn KeyValueStore, prefix: &str) -> usize {
    let doomed: Vec<String> = store.keys().into_iter().filter(|k| k.starts_with(prefix)).collect();
    for key in &doomed {
        store.remove(key);
    }
    doomed.len()
}

/// In-memory store used for SSR and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

/// `window.localStorage`. Every call no-ops outside hydrate.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.set_item(key, value);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
        }
    }

    fn remove(&self, key: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(key);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
        }
    }

    fn keys(&self) -> Vec<String> {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = local_storage() else {
                return Vec::new();
            };
            let len = storage.length().unwrap_or(0);
            (0..len).filter_map(|i| storage.key(i).ok().flatten()).collect()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Vec::new()
        }
    }
}
