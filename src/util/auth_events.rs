//! DOM broadcast of auth-state changes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Server-rendered page scripts outside the Leptos tree listen for an
//! `auth-state-changed` `CustomEvent` on `document.body` to react to sign-in
//! and sign-out. The store dispatches it for every provider event except the
//! initial session report.

#[cfg(test)]
#[path = "auth_events_test.rs"]
mod auth_events_test;

use crate::net::auth_provider::AuthEvent;
use crate::net::types::Session;

/// DOM event name.
pub const AUTH_STATE_CHANGED: &str = "auth-state-changed";

/// Whether `event` is announced to page scripts.
pub fn is_broadcast(event: AuthEvent) -> bool {
    event != AuthEvent::InitialSession
}

/// JSON `detail` payload: `{event, session}`.
pub fn event_detail_json(event: AuthEvent, session: Option<&Session>) -> String {
    serde_json::json!({ "event": event.as_str(), "session": session }).to_string()
}

/// Dispatch the event on `document.body`. No-op off browser.
pub fn dispatch(event: AuthEvent, session: Option<&Session>) {
    #[cfg(feature = "hydrate")]
    {
        let Some(body) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.body()) else {
            return;
        };
        let detail = js_sys::JSON::parse(&event_detail_json(event, session))
            .unwrap_or(wasm_bindgen::JsValue::NULL);
        let init = web_sys::CustomEventInit::new();
        init.set_detail(&detail);
        match web_sys::CustomEvent::new_with_event_init_dict(AUTH_STATE_CHANGED, &init) {
            Ok(ev) => {
                let _ = body.dispatch_event(&ev);
            }
            Err(_) => log::warn!("failed to build {AUTH_STATE_CHANGED} event"),
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (event, session);
    }
}
