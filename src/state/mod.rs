//! Client state: the session store and the plain state it publishes.

pub mod auth;
pub mod profile_cache;
pub mod room_create;
pub mod session_store;
pub mod ui;
