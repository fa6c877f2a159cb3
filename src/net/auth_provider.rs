//! Auth provider client: the seam between the session store and the hosted
//! authentication service.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store never talks to the provider directly; it receives a ready
//! [`AuthProvider`] at construction. In the browser that is [`SupabaseAuth`],
//! a thin client for the GoTrue REST contract (password grant, refresh grant,
//! signup, logout, recover). When the server does not hand out provider
//! settings, [`UnconfiguredProvider`] takes its place and rejects everything,
//! which leaves the app fully usable as an anonymous visitor.
//!
//! TRADE-OFFS
//! ==========
//! The persisted session is read back on `get_session` and refreshed only
//! when expired. There is no cross-tab broadcast; another tab's sign-out is
//! noticed on the next 401 or page load.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "auth_provider_test.rs"]
mod auth_provider_test;

use std::rc::Rc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::Session;
use crate::util::clock::Clock;
use crate::util::storage::{KeyValueStore, load_json, save_json};

/// Endpoint that hands out the public provider settings.
pub const AUTH_CONFIG_PATH: &str = "/api/config/supabase";

/// Session lifecycle events reported by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

impl AuthEvent {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InitialSession => "INITIAL_SESSION",
            Self::SignedIn => "SIGNED_IN",
            Self::SignedOut => "SIGNED_OUT",
            Self::TokenRefreshed => "TOKEN_REFRESHED",
            Self::UserUpdated => "USER_UPDATED",
            Self::PasswordRecovery => "PASSWORD_RECOVERY",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authentication service is not configured")]
    NotConfigured,
    #[error("{0}")]
    Rejected(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid auth response: {0}")]
    Decode(String),
    #[error("not available on server")]
    Unavailable,
}

/// Client side of the hosted auth service.
#[async_trait(?Send)]
pub trait AuthProvider {
    /// False for the placeholder used when no settings were served.
    fn is_configured(&self) -> bool {
        true
    }

    /// Current session, refreshing it first when it has expired.
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Returns `None` when the account awaits email confirmation.
    async fn sign_up(&self, email: &str, password: &str, metadata: serde_json::Value)
    -> Result<Option<Session>, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn reset_password(&self, email: &str, redirect_to: &str) -> Result<(), AuthError>;

    /// Exchange the refresh token for a new session.
    async fn refresh_session(&self) -> Result<Option<Session>, AuthError>;
}

// =============================================================================
// CONFIG
// =============================================================================

/// Public provider settings served by `/api/config/supabase`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "anonKey")]
    pub anon_key: String,
}

impl AuthConfig {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }
}

/// Fetch provider settings from the rooms server.
///
/// # Errors
///
/// Returns an error if the request fails or the body does not decode.
pub async fn fetch_auth_config(api_base: &str) -> Result<AuthConfig, crate::net::api::ApiError> {
    #[cfg(feature = "hydrate")]
    {
        use crate::net::api::{ApiError, error_from_body};

        let url = format!("{api_base}{AUTH_CONFIG_PATH}");
        let resp = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if !resp.ok() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }
        resp.json::<AuthConfig>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = api_base;
        Err(crate::net::api::ApiError::Unavailable)
    }
}

/// Pick the provider for a config lookup result.
pub fn provider_from_config(
    config: Result<AuthConfig, crate::net::api::ApiError>,
    storage: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
) -> Rc<dyn AuthProvider> {
    match config {
        Ok(config) if config.is_complete() => Rc::new(SupabaseAuth::new(config, storage, clock)),
        Ok(_) => {
            log::error!("auth config is incomplete; running without sign-in");
            Rc::new(UnconfiguredProvider)
        }
        Err(e) => {
            log::error!("auth config unavailable: {e}");
            Rc::new(UnconfiguredProvider)
        }
    }
}

// =============================================================================
// UNCONFIGURED
// =============================================================================

/// Stand-in used when the provider settings are missing. Every call rejects.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnconfiguredProvider;

#[async_trait(?Send)]
impl AuthProvider for UnconfiguredProvider {
    fn is_configured(&self) -> bool {
        false
    }

    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        Err(AuthError::NotConfigured)
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Session, AuthError> {
        Err(AuthError::NotConfigured)
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _metadata: serde_json::Value,
    ) -> Result<Option<Session>, AuthError> {
        Err(AuthError::NotConfigured)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Err(AuthError::NotConfigured)
    }

    async fn reset_password(&self, _email: &str, _redirect_to: &str) -> Result<(), AuthError> {
        Err(AuthError::NotConfigured)
    }

    async fn refresh_session(&self) -> Result<Option<Session>, AuthError> {
        Err(AuthError::NotConfigured)
    }
}

// =============================================================================
// SUPABASE (GoTrue REST)
// =============================================================================

/// Project reference: the first DNS label of the provider host.
pub fn project_ref(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme
        .split(['.', ':', '/'])
        .next()
        .unwrap_or_default()
        .to_owned()
}

/// localStorage key the provider session is persisted under.
pub fn session_storage_key(url: &str) -> String {
    format!("sb-{}-auth-token", project_ref(url))
}

/// Whether the session's access token has expired at `now_ms`.
pub fn session_expired(session: &Session, now_ms: i64) -> bool {
    session.expires_at.is_some_and(|exp| exp.saturating_mul(1000) <= now_ms)
}

/// Fill `expires_at` from `expires_in` when the provider omitted it.
pub fn stamp_expiry(mut session: Session, now_ms: i64) -> Session {
    if session.expires_at.is_none() {
        session.expires_at = session.expires_in.map(|secs| now_ms / 1000 + secs);
    }
    session
}

/// Human-readable message from a provider error body.
pub fn provider_error_message(status: u16, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let field = parsed.as_ref().and_then(|v| {
        ["error_description", "msg", "message", "error"]
            .iter()
            .find_map(|k| v.get(*k).and_then(serde_json::Value::as_str))
            .map(str::to_owned)
    });
    match field {
        Some(message) if !message.is_empty() => message,
        _ if !body.trim().is_empty() && parsed.is_none() => body.trim().to_owned(),
        _ => format!("auth request failed: {status}"),
    }
}

/// Decode a token/signup response. `None` when it carries no session.
pub fn session_from_value(value: serde_json::Value, now_ms: i64) -> Result<Option<Session>, AuthError> {
    if value.get("access_token").is_none() {
        return Ok(None);
    }
    let session: Session = serde_json::from_value(value).map_err(|e| AuthError::Decode(e.to_string()))?;
    Ok(Some(stamp_expiry(session, now_ms)))
}

/// GoTrue REST client with localStorage session persistence.
pub struct SupabaseAuth {
    config: AuthConfig,
    storage: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
}

impl SupabaseAuth {
    #[must_use]
    pub fn new(config: AuthConfig, storage: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        Self { config, storage, clock }
    }

    fn storage_key(&self) -> String {
        session_storage_key(&self.config.url)
    }

    fn persisted(&self) -> Option<Session> {
        load_json(&*self.storage, &self.storage_key())
    }

    fn persist(&self, session: &Session) {
        save_json(&*self.storage, &self.storage_key(), session);
    }

    fn forget(&self) {
        self.storage.remove(&self.storage_key());
    }

    #[cfg(feature = "hydrate")]
    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{path}", self.config.url.trim_end_matches('/'))
    }

    /// POST a JSON body to the provider and return the decoded JSON response.
    async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<serde_json::Value, AuthError> {
        #[cfg(feature = "hydrate")]
        {
            let network = |e: gloo_net::Error| AuthError::Network(e.to_string());
            let mut builder =
                gloo_net::http::Request::post(&self.endpoint(path)).header("apikey", &self.config.anon_key);
            if let Some(token) = bearer {
                builder = builder.header("Authorization", &crate::net::api::bearer_header(token));
            }
            let resp = builder.json(body).map_err(network)?.send().await.map_err(network)?;
            let status = resp.status();
            let text = resp.text().await.map_err(network)?;
            if !resp.ok() {
                return Err(AuthError::Rejected(provider_error_message(status, &text)));
            }
            if text.trim().is_empty() {
                return Ok(serde_json::Value::Null);
            }
            serde_json::from_str(&text).map_err(|e| AuthError::Decode(e.to_string()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (path, body, bearer);
            Err(AuthError::Unavailable)
        }
    }

    async fn exchange(&self, path: &str, body: serde_json::Value) -> Result<Session, AuthError> {
        let value = self.post(path, &body, None).await?;
        let session = session_from_value(value, self.clock.now_ms())?
            .ok_or_else(|| AuthError::Decode("token response without session".to_owned()))?;
        self.persist(&session);
        Ok(session)
    }

    async fn refresh_with(&self, refresh_token: &str) -> Result<Session, AuthError> {
        self.exchange(
            "/token?grant_type=refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }
}

#[async_trait(?Send)]
impl AuthProvider for SupabaseAuth {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(session) = self.persisted() else {
            return Ok(None);
        };
        if !session_expired(&session, self.clock.now_ms()) {
            return Ok(Some(session));
        }
        let Some(refresh_token) = session.refresh_token.clone() else {
            self.forget();
            return Ok(None);
        };
        match self.refresh_with(&refresh_token).await {
            Ok(fresh) => Ok(Some(fresh)),
            Err(AuthError::Rejected(message)) => {
                log::warn!("stored session could not be refreshed: {message}");
                self.forget();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.exchange(
            "/token?grant_type=password",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<Option<Session>, AuthError> {
        let body = serde_json::json!({ "email": email, "password": password, "data": metadata });
        let value = self.post("/signup", &body, None).await?;
        let session = session_from_value(value, self.clock.now_ms())?;
        if let Some(session) = &session {
            self.persist(session);
        }
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let token = self.persisted().and_then(|s| s.access_token);
        self.forget();
        match token {
            Some(token) => self.post("/logout", &serde_json::Value::Null, Some(&token)).await.map(|_| ()),
            None => Ok(()),
        }
    }

    async fn reset_password(&self, email: &str, redirect_to: &str) -> Result<(), AuthError> {
        let body = serde_json::json!({ "email": email, "redirect_to": redirect_to });
        self.post("/recover", &body, None).await.map(|_| ())
    }

    async fn refresh_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(refresh_token) = self.persisted().and_then(|s| s.refresh_token) else {
            return Ok(None);
        };
        self.refresh_with(&refresh_token).await.map(Some)
    }
}
