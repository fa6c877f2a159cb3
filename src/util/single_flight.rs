//! Keyed request coalescing.
//!
//! DESIGN
//! ======
//! Each key maps to a shared pending future. A caller arriving while a request
//! for its key is outstanding awaits that same future instead of starting a
//! second one. The entry is removed when the work resolves, so the next call
//! after completion starts fresh.
//!
//! The map lives behind `Rc<RefCell<..>>`: the client runs on a single-threaded
//! event loop and the futures are `!Send`.

#[cfg(test)]
#[path = "single_flight_test.rs"]
mod single_flight_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

/// A pending coalesced request. Clone it to await from several places.
pub type Flight<V> = Shared<LocalBoxFuture<'static, V>>;

pub struct SingleFlight<K, V> {
    inflight: Rc<RefCell<HashMap<K, Flight<V>>>>,
}

impl<K, V> Default for SingleFlight<K, V> {
    fn default() -> Self {
        Self { inflight: Rc::new(RefCell::new(HashMap::new())) }
    }
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the outstanding request for `key`, or build one with `start`.
    ///
    /// `start` is only invoked when nothing is in flight for `key`.
    pub fn join_or_start<F, Fut>(&self, key: K, start: F) -> Flight<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + 'static,
    {
        if let Some(flight) = self.pending(&key) {
            return flight;
        }

        let registry = Rc::clone(&self.inflight);
        let done_key = key.clone();
        let work = start();
        let flight = async move {
            let value = work.await;
            registry.borrow_mut().remove(&done_key);
            value
        }
        .boxed_local()
        .shared();

        self.inflight.borrow_mut().insert(key, flight.clone());
        flight
    }

    /// Whether a request for `key` is outstanding.
    #[must_use]
    pub fn is_in_flight(&self, key: &K) -> bool {
        self.inflight.borrow().contains_key(key)
    }

    /// Number of outstanding keys.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inflight.borrow().len()
    }

    fn pending(&self, key: &K) -> Option<Flight<V>> {
        self.inflight.borrow().get(key).cloned()
    }
}
