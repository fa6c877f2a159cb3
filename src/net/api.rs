//! REST API wrappers for the rooms backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and host tests: every call returns
//! [`ApiError::Unavailable`] since these endpoints are only meaningful in the
//! browser. The session store depends on the [`Backend`] trait, not on
//! [`HttpBackend`], so tests substitute their own implementation.
//!
//! ERROR HANDLING
//! ==============
//! Non-OK responses become [`ApiError::Status`] carrying the server's
//! `{error, message}` body when it sent one, plain text otherwise. Callers
//! decide whether a failure is surfaced or swallowed.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;

use super::types::{
    ApiErrorBody, CreateRoomRequest, GameVersion, JoinRoomRequest, Profile, Room, RoomActionResponse, RoomStatus,
};
#[cfg(feature = "hydrate")]
use super::types::{CurrentRoomResponse, GameVersionsResponse, ProfileEnvelope, PsnIdBody};
use crate::config::ClientConfig;

pub const SYNC_PATH: &str = "/api/auth/sync";
pub const ME_PATH: &str = "/api/user/me";
pub const PSN_ID_PATH: &str = "/api/auth/psn-id";
pub const CURRENT_ROOM_PATH: &str = "/api/user/current-room";
pub const LEAVE_CURRENT_ROOM_PATH: &str = "/api/leave-current-room";
pub const ROOM_STATUS_PATH: &str = "/api/user/current/room-status";
pub const GAME_VERSIONS_PATH: &str = "/api/game-versions/active";
pub const CREATE_ROOM_PATH: &str = "/rooms";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{}", status_message(*status, message.as_deref()))]
    Status {
        status: u16,
        code: Option<String>,
        message: Option<String>,
    },
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// HTTP status for `Status` errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable error code from the response body, e.g. `HOST_ROOM_ACTIVE`.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Status { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

fn status_message(status: u16, message: Option<&str>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!("request failed ({status}): {m}"),
        _ => format!("request failed: {status}"),
    }
}

/// Build an [`ApiError::Status`] from a non-OK response body.
pub fn error_from_body(status: u16, body: &str) -> ApiError {
    let trimmed = body.trim();
    match serde_json::from_str::<ApiErrorBody>(trimmed) {
        Ok(parsed) => ApiError::Status { status, code: parsed.error, message: parsed.message },
        Err(_) => ApiError::Status {
            status,
            code: None,
            message: (!trimmed.is_empty()).then(|| trimmed.to_owned()),
        },
    }
}

pub fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn join_room_path(room_id: &str) -> String {
    format!("/rooms/{room_id}/join")
}

/// Backend operations the session store depends on.
#[async_trait(?Send)]
pub trait Backend {
    /// `POST /api/auth/sync` with `{psn_id}`.
    async fn sync_user(&self, token: &str, psn_id: Option<&str>) -> Result<(), ApiError>;
    /// `GET /api/user/me`.
    async fn fetch_me(&self, token: &str) -> Result<Profile, ApiError>;
    /// `PUT /api/auth/psn-id`.
    async fn update_psn_id(&self, token: &str, psn_id: &str) -> Result<Profile, ApiError>;
    /// `GET /api/user/current-room` with same-origin credentials.
    async fn fetch_current_room(&self) -> Result<Option<Room>, ApiError>;
    /// `POST /api/leave-current-room` with same-origin credentials.
    async fn leave_current_room(&self) -> Result<(), ApiError>;
    /// `GET /api/user/current/room-status`.
    async fn room_status(&self, token: &str) -> Result<RoomStatus, ApiError>;
    /// `GET /api/game-versions/active`.
    async fn game_versions(&self) -> Result<Vec<GameVersion>, ApiError>;
    /// `POST /rooms`.
    async fn create_room(&self, token: &str, request: &CreateRoomRequest) -> Result<RoomActionResponse, ApiError>;
    /// `POST /rooms/{id}/join`; the bearer is optional for password-only rooms.
    async fn join_room(
        &self,
        token: Option<&str>,
        room_id: &str,
        request: &JoinRoomRequest,
    ) -> Result<RoomActionResponse, ApiError>;
}

/// `gloo-net` implementation of [`Backend`].
#[derive(Clone, Debug)]
pub struct HttpBackend {
    config: ClientConfig,
}

impl HttpBackend {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    #[cfg(feature = "hydrate")]
    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }
}

#[cfg(feature = "hydrate")]
fn network(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

#[cfg(feature = "hydrate")]
async fn expect_ok(resp: gloo_net::http::Response) -> Result<gloo_net::http::Response, ApiError> {
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(error_from_body(status, &body))
}

#[cfg(feature = "hydrate")]
async fn read_json<T: serde::de::DeserializeOwned>(resp: gloo_net::http::Response) -> Result<T, ApiError> {
    let resp = expect_ok(resp).await?;
    resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn sync_user(&self, token: &str, psn_id: Option<&str>) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let body = PsnIdBody { psn_id: psn_id.map(str::to_owned) };
            let resp = gloo_net::http::Request::post(&self.url(SYNC_PATH))
                .header("Authorization", &bearer_header(token))
                .json(&body)
                .map_err(network)?
                .send()
                .await
                .map_err(network)?;
            expect_ok(resp).await.map(|_| ())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (token, psn_id, &self.config);
            Err(ApiError::Unavailable)
        }
    }

    async fn fetch_me(&self, token: &str) -> Result<Profile, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(&self.url(ME_PATH))
                .header("Authorization", &bearer_header(token))
                .send()
                .await
                .map_err(network)?;
            read_json::<ProfileEnvelope>(resp).await.map(|env| env.user)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
            Err(ApiError::Unavailable)
        }
    }

    async fn update_psn_id(&self, token: &str, psn_id: &str) -> Result<Profile, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let body = PsnIdBody { psn_id: Some(psn_id.to_owned()) };
            let resp = gloo_net::http::Request::put(&self.url(PSN_ID_PATH))
                .header("Authorization", &bearer_header(token))
                .json(&body)
                .map_err(network)?
                .send()
                .await
                .map_err(network)?;
            read_json::<ProfileEnvelope>(resp).await.map(|env| env.user)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (token, psn_id);
            Err(ApiError::Unavailable)
        }
    }

    async fn fetch_current_room(&self) -> Result<Option<Room>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(&self.url(CURRENT_ROOM_PATH))
                .credentials(web_sys::RequestCredentials::SameOrigin)
                .send()
                .await
                .map_err(network)?;
            read_json::<CurrentRoomResponse>(resp).await.map(|body| body.current_room)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ApiError::Unavailable)
        }
    }

    async fn leave_current_room(&self) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&self.url(LEAVE_CURRENT_ROOM_PATH))
                .credentials(web_sys::RequestCredentials::SameOrigin)
                .send()
                .await
                .map_err(network)?;
            expect_ok(resp).await.map(|_| ())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ApiError::Unavailable)
        }
    }

    async fn room_status(&self, token: &str) -> Result<RoomStatus, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(&self.url(ROOM_STATUS_PATH))
                .header("Authorization", &bearer_header(token))
                .send()
                .await
                .map_err(network)?;
            read_json::<RoomStatus>(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
            Err(ApiError::Unavailable)
        }
    }

    async fn game_versions(&self) -> Result<Vec<GameVersion>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(&self.url(GAME_VERSIONS_PATH))
                .credentials(web_sys::RequestCredentials::SameOrigin)
                .send()
                .await
                .map_err(network)?;
            read_json::<GameVersionsResponse>(resp).await.map(|body| body.game_versions)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ApiError::Unavailable)
        }
    }

    async fn create_room(&self, token: &str, request: &CreateRoomRequest) -> Result<RoomActionResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&self.url(CREATE_ROOM_PATH))
                .header("Authorization", &bearer_header(token))
                .json(request)
                .map_err(network)?
                .send()
                .await
                .map_err(network)?;
            read_json::<RoomActionResponse>(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (token, request);
            Err(ApiError::Unavailable)
        }
    }

    async fn join_room(
        &self,
        token: Option<&str>,
        room_id: &str,
        request: &JoinRoomRequest,
    ) -> Result<RoomActionResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let mut builder = gloo_net::http::Request::post(&self.url(&join_room_path(room_id)));
            if let Some(token) = token {
                builder = builder.header("Authorization", &bearer_header(token));
            }
            let resp = builder
                .json(request)
                .map_err(network)?
                .send()
                .await
                .map_err(network)?;
            read_json::<RoomActionResponse>(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (token, room_id, request);
            Err(ApiError::Unavailable)
        }
    }
}
