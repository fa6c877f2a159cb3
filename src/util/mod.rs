//! Utility helpers shared across the store and UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, cookies,
//! DOM events, clocks) from store and component logic so both stay testable
//! on the host.

pub mod auth;
pub mod auth_events;
pub mod clock;
pub mod session_cookie;
pub mod single_flight;
pub mod storage;
pub mod validation;
