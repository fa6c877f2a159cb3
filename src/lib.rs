//! # mhp-rooms-client
//!
//! Leptos + WASM frontend for the MHP Rooms matchmaking site.
//!
//! The core is the session store (`state::session_store`): it mirrors the
//! hosted auth provider's session, keeps the backend user record in sync,
//! caches the user's profile, and tracks the room they are in. Pages and
//! components read that state through Leptos context.
//!
//! Browser-only behavior compiles everywhere and no-ops outside the
//! `hydrate` feature, so store logic is tested on the host.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
