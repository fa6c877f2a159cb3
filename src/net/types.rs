//! Wire DTOs for the auth provider and the rooms REST API.
//!
//! DESIGN
//! ======
//! Field names follow the server's snake_case JSON. Older endpoints and
//! server-embedded page data use camelCase for some room fields, so those carry
//! serde aliases instead of a second type. Everything optional on the wire is
//! `Option` + `#[serde(default)]` so partial payloads still decode.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// AUTH SESSION
// =============================================================================

/// Provider-managed metadata attached to the auth user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub psn_id: Option<String>,
}

/// Identity portion of a provider session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Token bundle issued by the auth provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Expiry as Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Lifetime in seconds at issue time.
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

impl Session {
    /// Bearer token, ignoring empty strings.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// Denormalized user record served by `/api/user/me`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub psn_online_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// `{ "user": Profile }` envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEnvelope {
    pub user: Profile,
}

// =============================================================================
// ROOMS
// =============================================================================

/// Identifier that may be numeric or a UUID string depending on the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Int(i64),
    Text(String),
}

impl IdValue {
    /// All-digit input becomes `Int`, anything else stays text.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = trimmed.parse::<i64>() {
                return Self::Int(n);
            }
        }
        Self::Text(trimmed.to_owned())
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameVersion {
    pub id: IdValue,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameVersionsResponse {
    #[serde(default)]
    pub game_versions: Vec<GameVersion>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomHost {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
}

impl RoomHost {
    /// Username first, display name second.
    #[must_use]
    pub fn label(&self) -> &str {
        self.username
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.display_name.as_deref())
            .unwrap_or_default()
    }
}

fn default_max_players() -> u32 {
    4
}

/// A matchmaking room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    #[serde(default)]
    pub room_code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "gameVersion")]
    pub game_version: Option<GameVersion>,
    #[serde(default)]
    pub host: Option<RoomHost>,
    #[serde(default = "default_max_players", alias = "maxPlayers")]
    pub max_players: u32,
    #[serde(default, alias = "currentPlayers")]
    pub current_players: u32,
    #[serde(default, alias = "targetMonster")]
    pub target_monster: Option<String>,
    #[serde(default, alias = "rankRequirement")]
    pub rank_requirement: Option<String>,
    #[serde(default, alias = "isClosed")]
    pub is_closed: bool,
    #[serde(default, alias = "hasPassword")]
    pub has_password: bool,
    #[serde(default, alias = "isJoined")]
    pub is_joined: bool,
}

/// `GET /api/user/current-room` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentRoomResponse {
    #[serde(default)]
    pub current_room: Option<Room>,
}

/// The caller's relationship to their active room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomRole {
    Host,
    Guest,
    #[default]
    #[serde(other)]
    None,
}

/// `GET /api/user/current/room-status` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStatus {
    #[serde(default)]
    pub status: RoomRole,
    #[serde(default)]
    pub room: Option<Room>,
}

/// `POST /rooms` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub game_version_id: IdValue,
    pub max_players: u32,
    pub password: Option<String>,
    pub target_monster: Option<String>,
    pub rank_requirement: Option<String>,
    pub description: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// `POST /rooms/{id}/join` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Leave the current room first.
    #[serde(default, rename = "forceJoin", skip_serializing_if = "is_false")]
    pub force_join: bool,
    /// Acknowledge a block-relationship warning.
    #[serde(default, rename = "confirmJoin", skip_serializing_if = "is_false")]
    pub confirm_join: bool,
}

/// Success body for create/join.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomActionResponse {
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default, alias = "requiresConfirmation")]
    pub requires_confirmation: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl RoomActionResponse {
    /// The server asks the user to confirm joining past a block relationship.
    #[must_use]
    pub fn needs_block_confirmation(&self) -> bool {
        self.requires_confirmation && self.warning.as_deref() == Some("USER_BLOCKING_HOST")
    }
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsnIdBody {
    pub psn_id: Option<String>,
}

/// Error body shape shared by the API handlers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
