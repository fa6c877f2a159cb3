//! Client configuration constants and overrides.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser has no process environment, so overrides are baked in at build
//! time through `option_env!`. Auth provider settings are fetched at runtime
//! (see `net::auth_provider::fetch_auth_config`).

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Minimum time between two completed background syncs.
pub const DEFAULT_SYNC_COOLDOWN_MS: i64 = 5_000;

/// Lifetime of a persisted profile cache slot.
pub const DEFAULT_PROFILE_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Namespace prefix for persisted profile cache slots.
pub const DEFAULT_CACHE_PREFIX: &str = "mhp-rooms-dbuser-";

/// Avatar shown when the profile has none.
pub const DEFAULT_AVATAR_URL: &str = "/static/images/default-avatar.webp";

/// Cookie the server reads to authenticate server-rendered pages.
pub const DEFAULT_SESSION_COOKIE: &str = "sb-access-token";

/// How long before token expiry the refresh loop kicks in.
pub const DEFAULT_REFRESH_MARGIN_MS: i64 = 60_000;

/// Runtime configuration for the session store and API wrappers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix prepended to every REST path. Empty means same-origin.
    pub api_base: String,
    pub sync_cooldown_ms: i64,
    pub profile_ttl_ms: i64,
    pub cache_prefix: String,
    pub default_avatar: String,
    pub session_cookie: String,
    pub refresh_margin_ms: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: api_base_override(option_env!("MHP_ROOMS_API_BASE")),
            sync_cooldown_ms: DEFAULT_SYNC_COOLDOWN_MS,
            profile_ttl_ms: DEFAULT_PROFILE_TTL_MS,
            cache_prefix: DEFAULT_CACHE_PREFIX.to_owned(),
            default_avatar: DEFAULT_AVATAR_URL.to_owned(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_owned(),
            refresh_margin_ms: DEFAULT_REFRESH_MARGIN_MS,
        }
    }
}

impl ClientConfig {
    /// Join the configured API base with an absolute REST path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }
}

/// Normalize a build-time API base: trims whitespace and trailing slashes.
fn api_base_override(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .map(|s| s.trim_end_matches('/'))
        .unwrap_or_default()
        .to_owned()
}
