//! Session synchronization store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth provider reports session changes; the store mirrors them into an
//! [`AuthState`], keeps the backend user record in sync, loads the profile
//! (cache first, then `/api/user/me`), and tracks the user's current room.
//! Leptos components read the state through a mirrored signal (see `app`).
//!
//! DESIGN
//! ======
//! The store is an explicit object built from injected services, never a
//! global. Background work (sync, profile, current room) is spawned through
//! the injected spawner and coalesced per user id with [`SingleFlight`], so
//! concurrent callers share one request.
//!
//! Every async result is fenced on the user id it was requested for: when the
//! session has moved to another user (or signed out) by the time the result
//! arrives, the result is dropped. Overlapping results for the same user are
//! applied in completion order.
//!
//! ERROR HANDLING
//! ==============
//! Background failures are logged and swallowed; state degrades to absent or
//! stale. User-initiated actions set `error` and return `Err`. Loading flags
//! are reset on every outcome.

#[cfg(test)]
#[path = "session_store_test.rs"]
mod session_store_test;

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use super::auth::{AuthState, AuthStatus};
use super::profile_cache::ProfileCache;
use crate::config::ClientConfig;
use crate::net::api::{ApiError, Backend};
use crate::net::auth_provider::{AuthError, AuthEvent, AuthProvider};
use crate::net::types::{GameVersion, JoinRoomRequest, Profile, Room, RoomActionResponse, RoomStatus, Session};
use crate::util::clock::Clock;
use crate::util::single_flight::SingleFlight;
use crate::util::storage::KeyValueStore;
use crate::util::validation::{CreateRoomForm, validate_email, validate_password, validate_psn_id};
use crate::util::{auth_events, session_cookie};

/// Shown when the auth provider settings could not be loaded.
pub const CONFIG_ERROR_MESSAGE: &str = "Sign-in is currently unavailable. Please try again later.";

/// Path the password-reset email links back to.
pub const RESET_PASSWORD_PATH: &str = "/auth/reset-password";

/// Runs a detached task on the local event loop.
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Resolves after the given number of milliseconds.
pub type Sleeper = Rc<dyn Fn(u32) -> LocalBoxFuture<'static, ()>>;

type StateListener = Rc<dyn Fn(&AuthState)>;
type EventListener = Rc<dyn Fn(AuthEvent, Option<&Session>)>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("authentication required")]
    AuthenticationRequired,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Services the store is built from.
pub struct StoreServices {
    pub auth: Rc<dyn AuthProvider>,
    pub backend: Rc<dyn Backend>,
    pub storage: Rc<dyn KeyValueStore>,
    pub clock: Rc<dyn Clock>,
    pub spawner: Spawner,
    pub sleeper: Sleeper,
}

/// Handle returned by [`SessionStore::subscribe`] and [`SessionStore::on_auth_change`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Runtime {
    init_started: bool,
    disposed: bool,
    /// Completion time of the last sync attempt for the current user.
    last_sync_ms: Option<i64>,
    /// User whose current room has been fetched successfully.
    room_fetched_for: Option<String>,
    game_versions: Option<Vec<GameVersion>>,
    /// Bumped on every session update so stale refresh timers stand down.
    refresh_generation: u64,
    next_listener: u64,
}

struct StoreInner {
    config: ClientConfig,
    services: StoreServices,
    cache: ProfileCache,
    state: RefCell<AuthState>,
    runtime: RefCell<Runtime>,
    sync_flight: SingleFlight<String, ()>,
    profile_flight: SingleFlight<String, Option<Profile>>,
    room_flight: SingleFlight<String, Option<Room>>,
    state_listeners: RefCell<Vec<(ListenerId, StateListener)>>,
    event_listeners: RefCell<Vec<(ListenerId, EventListener)>>,
}

/// Cheaply cloneable handle to the shared store.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<StoreInner>,
}

/// Milliseconds until the refresh timer should fire for a token expiring at
/// `expires_at_secs`.
pub fn refresh_delay_ms(expires_at_secs: i64, now_ms: i64, margin_ms: i64) -> i64 {
    (expires_at_secs.saturating_mul(1000) - margin_ms - now_ms).max(0)
}

impl SessionStore {
    #[must_use]
    pub fn new(services: StoreServices, config: ClientConfig) -> Self {
        let cache = ProfileCache::new(Rc::clone(&services.storage), config.cache_prefix.clone(), config.profile_ttl_ms);
        Self {
            inner: Rc::new(StoreInner {
                config,
                services,
                cache,
                state: RefCell::new(AuthState::default()),
                runtime: RefCell::new(Runtime::default()),
                sync_flight: SingleFlight::new(),
                profile_flight: SingleFlight::new(),
                room_flight: SingleFlight::new(),
                state_listeners: RefCell::new(Vec::new()),
                event_listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    fn now(&self) -> i64 {
        self.inner.services.clock.now_ms()
    }

    fn is_disposed(&self) -> bool {
        self.inner.runtime.borrow().disposed
    }

    fn current_user_id(&self) -> Option<String> {
        self.inner.state.borrow().user_id().map(str::to_owned)
    }

    fn is_current_user(&self, user_id: &str) -> bool {
        self.inner.state.borrow().user_id() == Some(user_id)
    }

    fn access_token(&self) -> Option<String> {
        self.inner.state.borrow().access_token().map(str::to_owned)
    }

    fn spawn(&self, work: impl Future<Output = ()> + 'static) {
        (self.inner.services.spawner)(work.boxed_local());
    }

    fn mutate(&self, apply: impl FnOnce(&mut AuthState)) {
        apply(&mut self.inner.state.borrow_mut());
        self.notify();
    }

    fn notify(&self) {
        if self.is_disposed() {
            return;
        }
        let snapshot = self.snapshot();
        let listeners: Vec<StateListener> =
            self.inner.state_listeners.borrow().iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    fn next_listener_id(&self) -> ListenerId {
        let mut runtime = self.inner.runtime.borrow_mut();
        runtime.next_listener += 1;
        ListenerId(runtime.next_listener)
    }

    // =========================================================================
    // LISTENERS
    // =========================================================================

    /// Call `listener` with a fresh snapshot after every state change.
    pub fn subscribe(&self, listener: impl Fn(&AuthState) + 'static) -> ListenerId {
        let id = self.next_listener_id();
        self.inner.state_listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Call `listener` for every broadcast provider event.
    pub fn on_auth_change(&self, listener: impl Fn(AuthEvent, Option<&Session>) + 'static) -> ListenerId {
        let id = self.next_listener_id();
        self.inner.event_listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.inner.state_listeners.borrow_mut().retain(|(lid, _)| *lid != id);
        self.inner.event_listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// First call checks the provider session; later calls do nothing.
    pub async fn init(&self) {
        {
            let mut runtime = self.inner.runtime.borrow_mut();
            if runtime.init_started || runtime.disposed {
                log::debug!("session store init already started");
                return;
            }
            runtime.init_started = true;
        }
        if !self.inner.services.auth.is_configured() {
            log::error!("auth provider is not configured");
            self.mutate(|s| {
                s.status = AuthStatus::Unauthenticated;
                s.config_error = Some(CONFIG_ERROR_MESSAGE.to_owned());
            });
            return;
        }
        self.check_auth().await;
    }

    /// Re-read the provider session and apply it.
    pub async fn check_auth(&self) {
        if self.is_disposed() {
            return;
        }
        self.mutate(|s| s.status = AuthStatus::Checking);
        match self.inner.services.auth.get_session().await {
            Ok(session) => self.update_session(session),
            Err(e) => {
                log::warn!("session check failed: {e}");
                self.update_session(None);
            }
        }
    }

    /// Drop listeners and ignore every later session update.
    pub fn dispose(&self) {
        {
            let mut runtime = self.inner.runtime.borrow_mut();
            runtime.disposed = true;
            runtime.refresh_generation += 1;
        }
        self.inner.state_listeners.borrow_mut().clear();
        self.inner.event_listeners.borrow_mut().clear();
    }

    // =========================================================================
    // SESSION UPDATES
    // =========================================================================

    /// Provider change hook: apply the session, then broadcast the event.
    pub fn handle_auth_event(&self, event: AuthEvent, session: Option<Session>) {
        if self.is_disposed() {
            return;
        }
        log::debug!("auth event {}", event.as_str());
        self.update_session(session);
        if !auth_events::is_broadcast(event) {
            return;
        }
        let current = self.inner.state.borrow().session.clone();
        auth_events::dispatch(event, current.as_ref());
        let listeners: Vec<EventListener> =
            self.inner.event_listeners.borrow().iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in listeners {
            listener(event, current.as_ref());
        }
    }

    /// Replace the session and start the follow-up work it implies.
    pub fn update_session(&self, session: Option<Session>) {
        if self.is_disposed() {
            log::debug!("ignoring session update on disposed store");
            return;
        }
        let session = session.filter(|s| s.user.is_some());
        let previous_user = self.current_user_id();
        let next_user = session.as_ref().and_then(Session::user_id).map(str::to_owned);

        if previous_user != next_user {
            let mut runtime = self.inner.runtime.borrow_mut();
            runtime.last_sync_ms = None;
            runtime.room_fetched_for = None;
        }

        match (session, next_user) {
            (Some(session), Some(user_id)) => self.apply_signed_in(session, &user_id, previous_user.as_deref()),
            _ => self.apply_signed_out(previous_user.as_deref()),
        }
    }

    fn apply_signed_in(&self, session: Session, user_id: &str, previous_user: Option<&str>) {
        let now = self.now();
        let user_changed = previous_user != Some(user_id);
        let token = session.bearer().map(str::to_owned);
        let expires_at = session.expires_at;
        let cached = {
            let state = self.inner.state.borrow();
            if user_changed || state.profile.is_none() { self.inner.cache.read_at(user_id, now) } else { None }
        };

        self.mutate(|s| {
            if user_changed {
                s.profile = None;
                s.current_room = None;
                s.room_loading = false;
            }
            if cached.is_some() {
                s.profile = cached;
            }
            s.session = Some(session);
            s.status = AuthStatus::Authenticated;
        });

        let Some(token) = token else {
            log::debug!("session for {user_id} carries no access token");
            return;
        };
        session_cookie::store(
            &self.inner.config.session_cookie,
            &token,
            session_cookie::max_age_for(expires_at, now),
        );

        let this = self.clone();
        let sync_token = token.clone();
        self.spawn(async move { this.sync_user(&sync_token).await });

        let room_fetched = self.inner.runtime.borrow().room_fetched_for.as_deref() == Some(user_id);
        if !room_fetched {
            let this = self.clone();
            self.spawn(async move {
                this.fetch_current_room().await;
            });
        }

        self.schedule_refresh(expires_at);
    }

    fn apply_signed_out(&self, previous_user: Option<&str>) {
        self.inner.runtime.borrow_mut().refresh_generation += 1;
        self.mutate(|s| {
            s.session = None;
            s.status = AuthStatus::Unauthenticated;
            s.profile = None;
            s.current_room = None;
            s.room_loading = false;
        });
        session_cookie::clear(&self.inner.config.session_cookie);
        self.inner.cache.evict(previous_user);
    }

    /// Arm the token refresh timer for the current session. A later session
    /// update or sign-out bumps the generation and stands this timer down.
    fn schedule_refresh(&self, expires_at: Option<i64>) {
        let generation = {
            let mut runtime = self.inner.runtime.borrow_mut();
            runtime.refresh_generation += 1;
            runtime.refresh_generation
        };
        let Some(expires_at) = expires_at else {
            return;
        };
        let delay = refresh_delay_ms(expires_at, self.now(), self.inner.config.refresh_margin_ms);
        let sleep = (self.inner.services.sleeper)(u32::try_from(delay).unwrap_or(u32::MAX));
        let this = self.clone();
        self.spawn(async move {
            sleep.await;
            let current = {
                let runtime = this.inner.runtime.borrow();
                !runtime.disposed && runtime.refresh_generation == generation
            };
            if current {
                this.refresh_in_background().await;
            } else {
                log::debug!("stale refresh timer skipped");
            }
        });
    }

    /// Timer-driven refresh. Leaves `loading` and `error` alone; a rejected
    /// refresh grant signs the user out.
    async fn refresh_in_background(&self) {
        let user_id = self.current_user_id();
        match self.inner.services.auth.refresh_session().await {
            Ok(Some(session)) => {
                if self.current_user_id() == user_id {
                    self.handle_auth_event(AuthEvent::TokenRefreshed, Some(session));
                }
            }
            Ok(None) => log::debug!("no session to refresh"),
            Err(AuthError::Rejected(message)) => {
                log::warn!("token refresh rejected: {message}");
                if self.current_user_id() == user_id {
                    self.handle_auth_event(AuthEvent::SignedOut, None);
                }
            }
            Err(e) => log::warn!("token refresh failed: {e}"),
        }
    }

    // =========================================================================
    // BACKGROUND SYNC
    // =========================================================================

    fn within_cooldown(&self) -> bool {
        let last = self.inner.runtime.borrow().last_sync_ms;
        last.is_some_and(|t| self.now() - t < self.inner.config.sync_cooldown_ms)
    }

    /// Upsert the backend user record. Coalesced per user and cooled down.
    pub async fn sync_user(&self, token: &str) {
        if self.is_disposed() {
            return;
        }
        let Some(user_id) = self.current_user_id() else {
            return;
        };
        if !self.inner.sync_flight.is_in_flight(&user_id) && self.within_cooldown() {
            log::debug!("sync skipped: within cool-down");
            return;
        }
        let flight = self.inner.sync_flight.join_or_start(user_id.clone(), || {
            let this = self.clone();
            let token = token.to_owned();
            async move { this.run_sync(&user_id, &token).await }
        });
        flight.await;
    }

    async fn run_sync(&self, user_id: &str, token: &str) {
        let psn_id = self
            .inner
            .state
            .borrow()
            .user()
            .and_then(|u| u.user_metadata.psn_id.clone());
        let result = self.inner.services.backend.sync_user(token, psn_id.as_deref()).await;
        if self.is_current_user(user_id) {
            self.inner.runtime.borrow_mut().last_sync_ms = Some(self.now());
        }
        match result {
            Ok(()) => {
                let needs_profile = self.is_current_user(user_id) && self.inner.state.borrow().profile.is_none();
                if needs_profile {
                    self.fetch_db_user(token).await;
                }
            }
            Err(e) => log::warn!("user sync failed: {e}"),
        }
    }

    /// Load the profile from `/api/user/me` and cache it. Coalesced per user.
    pub async fn fetch_db_user(&self, token: &str) -> Option<Profile> {
        let user_id = self.current_user_id()?;
        let flight = self.inner.profile_flight.join_or_start(user_id.clone(), || {
            let this = self.clone();
            let token = token.to_owned();
            async move {
                match this.inner.services.backend.fetch_me(&token).await {
                    Ok(profile) => {
                        this.apply_profile(&user_id, &profile);
                        Some(profile)
                    }
                    Err(e) => {
                        log::warn!("profile fetch failed: {e}");
                        None
                    }
                }
            }
        });
        flight.await
    }

    fn apply_profile(&self, user_id: &str, profile: &Profile) {
        if !self.is_current_user(user_id) {
            log::debug!("dropping profile for signed-out user {user_id}");
            return;
        }
        self.inner.cache.write_at(user_id, profile, self.now());
        let profile = profile.clone();
        self.mutate(|s| s.profile = Some(profile));
    }

    // =========================================================================
    // CURRENT ROOM
    // =========================================================================

    /// Fetch the room the user is in. Coalesced per user.
    pub async fn fetch_current_room(&self) -> Option<Room> {
        if !self.inner.state.borrow().is_authenticated() {
            return None;
        }
        let user_id = self.current_user_id()?;
        if !self.inner.room_flight.is_in_flight(&user_id) {
            self.mutate(|s| s.room_loading = true);
        }
        let flight = self.inner.room_flight.join_or_start(user_id.clone(), || {
            let this = self.clone();
            async move {
                let result = this.inner.services.backend.fetch_current_room().await;
                if !this.is_current_user(&user_id) {
                    log::debug!("dropping current room for signed-out user {user_id}");
                    return result.ok().flatten();
                }
                let room = match result {
                    Ok(room) => {
                        this.inner.runtime.borrow_mut().room_fetched_for = Some(user_id.clone());
                        room
                    }
                    Err(e) => {
                        log::warn!("current room fetch failed: {e}");
                        None
                    }
                };
                let applied = room.clone();
                this.mutate(|s| {
                    s.current_room = applied;
                    s.room_loading = false;
                });
                room
            }
        });
        flight.await
    }

    /// Leave the current room. `false` when there is nothing to leave or the
    /// request fails.
    pub async fn leave_current_room(&self) -> bool {
        let eligible = {
            let state = self.inner.state.borrow();
            state.is_authenticated() && state.current_room.is_some()
        };
        if !eligible {
            return false;
        }
        let user_id = self.current_user_id();
        match self.inner.services.backend.leave_current_room().await {
            Ok(()) => {
                if self.current_user_id() == user_id {
                    self.mutate(|s| s.current_room = None);
                }
                true
            }
            Err(e) => {
                log::warn!("leave room failed: {e}");
                false
            }
        }
    }

    // =========================================================================
    // USER-INITIATED AUTH
    // =========================================================================

    async fn user_action<T>(&self, work: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
        self.mutate(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = work.await;
        self.mutate(|s| {
            s.loading = false;
            s.error = result.as_ref().err().map(ToString::to_string);
        });
        result
    }

    /// # Errors
    ///
    /// Returns a validation error for malformed input, or the provider error.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), StoreError> {
        self.user_action(async {
            validate_email(email).map_err(|m| StoreError::Validation(m.to_owned()))?;
            validate_password(password).map_err(|m| StoreError::Validation(m.to_owned()))?;
            let session = self.inner.services.auth.sign_in(email, password).await?;
            self.handle_auth_event(AuthEvent::SignedIn, Some(session));
            Ok::<_, StoreError>(())
        })
        .await
    }

    /// Create an account. `Ok(false)` means the account awaits email
    /// confirmation and no session was issued.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed input, or the provider error.
    pub async fn sign_up(&self, email: &str, password: &str, metadata: serde_json::Value) -> Result<bool, StoreError> {
        self.user_action(async {
            validate_email(email).map_err(|m| StoreError::Validation(m.to_owned()))?;
            validate_password(password).map_err(|m| StoreError::Validation(m.to_owned()))?;
            let issued = match self.inner.services.auth.sign_up(email, password, metadata).await? {
                Some(session) => {
                    self.handle_auth_event(AuthEvent::SignedIn, Some(session));
                    true
                }
                None => false,
            };
            Ok::<_, StoreError>(issued)
        })
        .await
    }

    /// Sign out. Local state is cleared even when the provider call fails.
    ///
    /// # Errors
    ///
    /// Returns the provider error after clearing local state.
    pub async fn sign_out(&self) -> Result<(), StoreError> {
        self.user_action(async {
            let result = self.inner.services.auth.sign_out().await;
            self.handle_auth_event(AuthEvent::SignedOut, None);
            result.map_err(StoreError::from)
        })
        .await
    }

    /// # Errors
    ///
    /// Returns a validation error for a malformed address, or the provider error.
    pub async fn reset_password(&self, email: &str) -> Result<(), StoreError> {
        let redirect_to = format!("{}{RESET_PASSWORD_PATH}", page_origin());
        self.user_action(async {
            validate_email(email).map_err(|m| StoreError::Validation(m.to_owned()))?;
            self.inner.services.auth.reset_password(email, &redirect_to).await?;
            Ok::<_, StoreError>(())
        })
        .await
    }

    /// # Errors
    ///
    /// Returns the provider error when the refresh grant is rejected.
    pub async fn refresh_session(&self) -> Result<(), StoreError> {
        self.user_action(async {
            if let Some(session) = self.inner.services.auth.refresh_session().await? {
                self.handle_auth_event(AuthEvent::TokenRefreshed, Some(session));
            }
            Ok::<_, StoreError>(())
        })
        .await
    }

    /// Save the PSN id on the backend and update the profile.
    ///
    /// # Errors
    ///
    /// `AuthenticationRequired` without an access token (no request is made),
    /// a validation error for a malformed id, or the API error.
    pub async fn update_psn_id(&self, psn_id: &str) -> Result<Profile, StoreError> {
        let (Some(token), Some(user_id)) = (self.access_token(), self.current_user_id()) else {
            return Err(StoreError::AuthenticationRequired);
        };
        self.user_action(async {
            validate_psn_id(psn_id).map_err(|m| StoreError::Validation(m.to_owned()))?;
            let profile = self.inner.services.backend.update_psn_id(&token, psn_id).await?;
            self.apply_profile(&user_id, &profile);
            Ok::<_, StoreError>(profile)
        })
        .await
    }

    /// Recover from a 401: re-check the session and report whether it survived.
    pub async fn handle_unauthorized(&self) -> bool {
        self.check_auth().await;
        self.inner.state.borrow().is_authenticated()
    }

    // =========================================================================
    // ROOMS
    // =========================================================================

    /// The caller's host/guest relationship to their active room.
    ///
    /// # Errors
    ///
    /// `AuthenticationRequired` without an access token, or the API error.
    pub async fn room_status(&self) -> Result<RoomStatus, StoreError> {
        let token = self.access_token().ok_or(StoreError::AuthenticationRequired)?;
        Ok(self.inner.services.backend.room_status(&token).await?)
    }

    /// Active game versions, cached after the first non-empty answer.
    ///
    /// # Errors
    ///
    /// Returns the API error on the first load.
    pub async fn game_versions(&self) -> Result<Vec<GameVersion>, StoreError> {
        if let Some(cached) = self.inner.runtime.borrow().game_versions.clone() {
            return Ok(cached);
        }
        let versions = self.inner.services.backend.game_versions().await?;
        if !versions.is_empty() {
            self.inner.runtime.borrow_mut().game_versions = Some(versions.clone());
        }
        Ok(versions)
    }

    /// # Errors
    ///
    /// `AuthenticationRequired` without an access token, a validation error for
    /// incomplete input, or the API error (e.g. `HOST_ROOM_ACTIVE`).
    pub async fn create_room(&self, form: &CreateRoomForm) -> Result<RoomActionResponse, StoreError> {
        let token = self.access_token().ok_or(StoreError::AuthenticationRequired)?;
        let request = form.to_request().map_err(StoreError::Validation)?;
        let response = self.inner.services.backend.create_room(&token, &request).await?;
        self.fetch_current_room().await;
        Ok(response)
    }

    /// Join a room. A response asking for block confirmation leaves state as is.
    ///
    /// # Errors
    ///
    /// Returns the API error (e.g. `HOST_CANNOT_JOIN`, `BLOCKED_BY_HOST`).
    pub async fn join_room(&self, room_id: &str, request: &JoinRoomRequest) -> Result<RoomActionResponse, StoreError> {
        let token = self.access_token();
        let response = self
            .inner
            .services
            .backend
            .join_room(token.as_deref(), room_id, request)
            .await?;
        if !response.needs_block_confirmation() {
            self.fetch_current_room().await;
        }
        Ok(response)
    }
}

/// `window.location.origin`, or empty off browser.
fn page_origin() -> String {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        String::new()
    }
}
