//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`AuthState`] is the snapshot the session store publishes to listeners.
//! Route guards and user-aware components read it through a mirrored
//! `RwSignal<AuthState>`, so every derived value here is a plain method.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::{Profile, Room, Session, SessionUser};

/// Name shown when no better identity is known.
pub const GUEST_NAME: &str = "Guest";

/// Where the store is in its auth lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthStatus {
    /// `init` has not run.
    #[default]
    Uninitialized,
    /// A provider session lookup is in progress.
    Checking,
    Authenticated,
    Unauthenticated,
}

/// Observable session state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub status: AuthStatus,
    pub session: Option<Session>,
    /// Server-side profile, from cache or `/api/user/me`.
    pub profile: Option<Profile>,
    pub current_room: Option<Room>,
    /// A user-initiated auth action is running.
    pub loading: bool,
    /// The current-room fetch is running.
    pub room_loading: bool,
    /// Message from the last failed user-initiated action.
    pub error: Option<String>,
    /// Set once when the auth provider could not be configured.
    pub config_error: Option<String>,
}

impl AuthState {
    #[must_use]
    pub fn user(&self) -> Option<&SessionUser> {
        self.session.as_ref().and_then(|s| s.user.as_ref())
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user().map(|u| u.id.as_str())
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().and_then(Session::bearer)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// The first session check has finished.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        matches!(self.status, AuthStatus::Authenticated | AuthStatus::Unauthenticated)
    }

    /// Profile display name, then email local part, then provider metadata name.
    #[must_use]
    pub fn display_name(&self) -> String {
        let non_empty = |s: &&str| !s.trim().is_empty();
        let profile_name = self.profile.as_ref().and_then(|p| p.display_name.as_deref()).filter(non_empty);
        let email_local = self
            .user()
            .and_then(|u| u.email.as_deref())
            .and_then(|e| e.split('@').next())
            .filter(non_empty);
        let metadata_name = self.user().and_then(|u| u.user_metadata.name.as_deref()).filter(non_empty);
        profile_name
            .or(email_local)
            .or(metadata_name)
            .unwrap_or(GUEST_NAME)
            .to_owned()
    }

    #[must_use]
    pub fn avatar_url(&self, default_avatar: &str) -> String {
        self.profile
            .as_ref()
            .and_then(|p| p.avatar_url.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or(default_avatar)
            .to_owned()
    }

    #[must_use]
    pub fn psn_id(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|p| p.psn_online_id.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// Signed in with a loaded profile that has no PSN id yet.
    #[must_use]
    pub fn needs_onboarding(&self) -> bool {
        self.is_authenticated() && self.profile.is_some() && self.psn_id().is_none()
    }
}
