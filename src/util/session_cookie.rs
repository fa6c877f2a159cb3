//! Session-indicator cookie mirroring the bearer token.
//!
//! SYSTEM CONTEXT
//! ==============
//! Server-rendered pages authenticate from a cookie rather than the
//! `Authorization` header, so the store mirrors the access token into it on
//! every authenticated session update and clears it on sign-out.
//!
//! TRADE-OFFS
//! ==========
//! Browser-only and best-effort; SSR paths no-op.

#[cfg(test)]
#[path = "session_cookie_test.rs"]
mod session_cookie_test;

/// Fallback lifetime when the session carries no expiry.
pub const DEFAULT_COOKIE_MAX_AGE_SECS: i64 = 60 * 60;

/// Build the `document.cookie` assignment that stores `token`.
pub fn cookie_assignment(name: &str, token: &str, max_age_secs: i64) -> String {
    let max_age = max_age_secs.max(0);
    format!("{name}={token}; path=/; max-age={max_age}; SameSite=Lax")
}

/// Build the `document.cookie` assignment that deletes the cookie.
pub fn clearing_assignment(name: &str) -> String {
    format!("{name}=; path=/; max-age=0; SameSite=Lax")
}

/// Remaining token lifetime in seconds, from the session's `expires_at`.
pub fn max_age_for(expires_at_secs: Option<i64>, now_ms: i64) -> i64 {
    expires_at_secs.map_or(DEFAULT_COOKIE_MAX_AGE_SECS, |exp| (exp - now_ms / 1000).max(0))
}

/// Write the cookie for `token`.
pub fn store(name: &str, token: &str, max_age_secs: i64) {
    write(&cookie_assignment(name, token, max_age_secs));
}

/// Remove the cookie.
pub fn clear(name: &str) {
    write(&clearing_assignment(name));
}

fn write(assignment: &str) {
    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen::JsCast;

        let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Ok(html) = doc.dyn_into::<web_sys::HtmlDocument>() {
            let _ = html.set_cookie(assignment);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = assignment;
    }
}
