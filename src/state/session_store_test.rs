use std::cell::Cell;

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::Shared;
use futures::task::LocalSpawnExt;

use super::*;
use crate::net::types::{CreateRoomRequest, SessionUser, UserMetadata};
use crate::util::storage::MemoryStorage;

const T0: i64 = 1_700_000_000_000;

// =============================================================
// Test doubles
// =============================================================

struct ManualClock(Cell<i64>);

impl ManualClock {
    fn advance(&self, ms: i64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.get()
    }
}

/// Holds backend calls pending until released.
#[derive(Default)]
struct Gate {
    pending: RefCell<Option<Shared<oneshot::Receiver<()>>>>,
}

impl Gate {
    fn hold(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.pending.borrow_mut() = Some(rx.shared());
        tx
    }

    async fn pass(&self) {
        let pending = self.pending.borrow().clone();
        if let Some(rx) = pending {
            let _ = rx.await;
        }
    }
}

struct MockBackend {
    gate: Gate,
    sync_calls: Cell<usize>,
    me_calls: Cell<usize>,
    psn_calls: Cell<usize>,
    room_calls: Cell<usize>,
    leave_calls: Cell<usize>,
    status_calls: Cell<usize>,
    version_calls: Cell<usize>,
    create_calls: Cell<usize>,
    join_calls: Cell<usize>,
    last_sync_psn: RefCell<Option<String>>,
    sync_result: RefCell<Result<(), ApiError>>,
    me_result: RefCell<Result<Profile, ApiError>>,
    room_result: RefCell<Result<Option<Room>, ApiError>>,
    leave_result: RefCell<Result<(), ApiError>>,
    join_result: RefCell<Result<RoomActionResponse, ApiError>>,
    create_result: RefCell<Result<RoomActionResponse, ApiError>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            gate: Gate::default(),
            sync_calls: Cell::new(0),
            me_calls: Cell::new(0),
            psn_calls: Cell::new(0),
            room_calls: Cell::new(0),
            leave_calls: Cell::new(0),
            status_calls: Cell::new(0),
            version_calls: Cell::new(0),
            create_calls: Cell::new(0),
            join_calls: Cell::new(0),
            last_sync_psn: RefCell::new(None),
            sync_result: RefCell::new(Ok(())),
            me_result: RefCell::new(Ok(profile("Alice", None))),
            room_result: RefCell::new(Ok(None)),
            leave_result: RefCell::new(Ok(())),
            join_result: RefCell::new(Ok(RoomActionResponse::default())),
            create_result: RefCell::new(Ok(RoomActionResponse::default())),
        }
    }
}

/// Sleeps handed to the store; each stays pending until fired.
#[derive(Default)]
struct Timers {
    armed: RefCell<Vec<(u32, oneshot::Sender<()>)>>,
}

impl Timers {
    fn delays(&self) -> Vec<u32> {
        self.armed.borrow().iter().map(|(ms, _)| *ms).collect()
    }

    fn fire_all(&self) {
        for (_, tx) in self.armed.borrow_mut().drain(..) {
            let _ = tx.send(());
        }
    }
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

#[async_trait(?Send)]
impl Backend for MockBackend {
    async fn sync_user(&self, _token: &str, psn_id: Option<&str>) -> Result<(), ApiError> {
        bump(&self.sync_calls);
        *self.last_sync_psn.borrow_mut() = psn_id.map(str::to_owned);
        self.gate.pass().await;
        self.sync_result.borrow().clone()
    }

    async fn fetch_me(&self, _token: &str) -> Result<Profile, ApiError> {
        bump(&self.me_calls);
        self.gate.pass().await;
        self.me_result.borrow().clone()
    }

    async fn update_psn_id(&self, _token: &str, psn_id: &str) -> Result<Profile, ApiError> {
        bump(&self.psn_calls);
        Ok(profile("Alice", Some(psn_id)))
    }

    async fn fetch_current_room(&self) -> Result<Option<Room>, ApiError> {
        bump(&self.room_calls);
        self.gate.pass().await;
        self.room_result.borrow().clone()
    }

    async fn leave_current_room(&self) -> Result<(), ApiError> {
        bump(&self.leave_calls);
        self.leave_result.borrow().clone()
    }

    async fn room_status(&self, _token: &str) -> Result<RoomStatus, ApiError> {
        bump(&self.status_calls);
        Ok(RoomStatus::default())
    }

    async fn game_versions(&self) -> Result<Vec<GameVersion>, ApiError> {
        bump(&self.version_calls);
        Ok(vec![GameVersion { id: crate::net::types::IdValue::Int(1), code: "MHP3".to_owned(), name: "MHP3rd".to_owned() }])
    }

    async fn create_room(&self, _token: &str, _request: &CreateRoomRequest) -> Result<RoomActionResponse, ApiError> {
        bump(&self.create_calls);
        self.create_result.borrow().clone()
    }

    async fn join_room(
        &self,
        _token: Option<&str>,
        _room_id: &str,
        _request: &JoinRoomRequest,
    ) -> Result<RoomActionResponse, ApiError> {
        bump(&self.join_calls);
        self.join_result.borrow().clone()
    }
}

struct MockAuth {
    configured: bool,
    session: RefCell<Result<Option<Session>, AuthError>>,
    sign_in_result: RefCell<Result<Session, AuthError>>,
    sign_up_result: RefCell<Result<Option<Session>, AuthError>>,
    sign_out_result: RefCell<Result<(), AuthError>>,
    refresh_result: RefCell<Result<Option<Session>, AuthError>>,
    get_session_calls: Cell<usize>,
    refresh_calls: Cell<usize>,
}

impl MockAuth {
    fn with_session(session: Option<Session>) -> Self {
        Self {
            configured: true,
            session: RefCell::new(Ok(session)),
            sign_in_result: RefCell::new(Ok(session_for("u1", Some("t1"), None))),
            sign_up_result: RefCell::new(Ok(None)),
            sign_out_result: RefCell::new(Ok(())),
            refresh_result: RefCell::new(Ok(Some(session_for("u1", Some("t2"), None)))),
            get_session_calls: Cell::new(0),
            refresh_calls: Cell::new(0),
        }
    }
}

#[async_trait(?Send)]
impl AuthProvider for MockAuth {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        bump(&self.get_session_calls);
        self.session.borrow().clone()
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Session, AuthError> {
        self.sign_in_result.borrow().clone()
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _metadata: serde_json::Value,
    ) -> Result<Option<Session>, AuthError> {
        self.sign_up_result.borrow().clone()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_result.borrow().clone()
    }

    async fn reset_password(&self, _email: &str, _redirect_to: &str) -> Result<(), AuthError> {
        Ok(())
    }

    async fn refresh_session(&self) -> Result<Option<Session>, AuthError> {
        bump(&self.refresh_calls);
        self.refresh_result.borrow().clone()
    }
}

fn session_for(user_id: &str, token: Option<&str>, email: Option<&str>) -> Session {
    Session {
        access_token: token.map(str::to_owned),
        refresh_token: Some("r1".to_owned()),
        expires_at: None,
        expires_in: Some(3600),
        token_type: Some("bearer".to_owned()),
        user: Some(SessionUser {
            id: user_id.to_owned(),
            email: email.map(str::to_owned),
            user_metadata: UserMetadata::default(),
        }),
    }
}

/// Session whose token expires an hour after `T0`.
fn expiring_session(user_id: &str, token: &str) -> Session {
    Session { expires_at: Some(T0 / 1000 + 3600), ..session_for(user_id, Some(token), None) }
}

fn profile(name: &str, psn: Option<&str>) -> Profile {
    Profile {
        display_name: Some(name.to_owned()),
        psn_online_id: psn.map(str::to_owned),
        ..Profile::default()
    }
}

fn room(id: &str) -> Room {
    serde_json::from_value(serde_json::json!({ "id": id, "name": "Hunt" })).unwrap()
}

struct Harness {
    store: SessionStore,
    backend: Rc<MockBackend>,
    auth: Rc<MockAuth>,
    storage: Rc<MemoryStorage>,
    clock: Rc<ManualClock>,
    timers: Rc<Timers>,
    pool: LocalPool,
}

fn harness_with(auth: MockAuth) -> Harness {
    let pool = LocalPool::new();
    let spawner = pool.spawner();
    let backend = Rc::new(MockBackend::default());
    let auth = Rc::new(auth);
    let storage = Rc::new(MemoryStorage::new());
    let clock = Rc::new(ManualClock(Cell::new(T0)));
    let timers = Rc::new(Timers::default());
    let armed = timers.clone();
    let services = StoreServices {
        auth: auth.clone(),
        backend: backend.clone(),
        storage: storage.clone(),
        clock: clock.clone(),
        spawner: Rc::new(move |work| {
            let _ = spawner.spawn_local(work);
        }),
        sleeper: Rc::new(move |ms| {
            let (tx, rx) = oneshot::channel();
            armed.armed.borrow_mut().push((ms, tx));
            async move {
                let _ = rx.await;
            }
            .boxed_local()
        }),
    };
    Harness { store: SessionStore::new(services, ClientConfig::default()), backend, auth, storage, clock, timers, pool }
}

fn harness() -> Harness {
    harness_with(MockAuth::with_session(None))
}

fn cache_key(user_id: &str) -> String {
    format!("{}{user_id}", crate::config::DEFAULT_CACHE_PREFIX)
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn init_is_idempotent() {
    let mut h = harness_with(MockAuth::with_session(Some(session_for("u1", Some("t1"), None))));
    let store = h.store.clone();
    h.pool.run_until(store.init());
    h.pool.run_until(store.init());
    assert_eq!(h.auth.get_session_calls.get(), 1);
    assert_eq!(store.snapshot().status, AuthStatus::Authenticated);
}

#[test]
fn init_without_session_settles_unauthenticated() {
    let mut h = harness();
    let store = h.store.clone();
    h.pool.run_until(store.init());
    let state = store.snapshot();
    assert_eq!(state.status, AuthStatus::Unauthenticated);
    assert!(state.is_initialized());
    assert_eq!(h.backend.sync_calls.get(), 0);
}

#[test]
fn provider_error_during_check_settles_unauthenticated() {
    let auth = MockAuth::with_session(None);
    *auth.session.borrow_mut() = Err(AuthError::Network("offline".to_owned()));
    let mut h = harness_with(auth);
    let store = h.store.clone();
    h.pool.run_until(store.init());
    assert_eq!(store.snapshot().status, AuthStatus::Unauthenticated);
}

#[test]
fn unconfigured_provider_sets_persistent_config_error() {
    let auth = MockAuth { configured: false, ..MockAuth::with_session(None) };
    let mut h = harness_with(auth);
    let store = h.store.clone();
    h.pool.run_until(store.init());
    let state = store.snapshot();
    assert_eq!(state.status, AuthStatus::Unauthenticated);
    assert_eq!(state.config_error.as_deref(), Some(CONFIG_ERROR_MESSAGE));
    assert_eq!(h.auth.get_session_calls.get(), 0);
}

#[test]
fn check_auth_passes_through_checking() {
    let mut h = harness();
    let store = h.store.clone();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |s| sink.borrow_mut().push(s.status));
    h.pool.run_until(store.check_auth());
    assert_eq!(seen.borrow().first(), Some(&AuthStatus::Checking));
    assert_eq!(seen.borrow().last(), Some(&AuthStatus::Unauthenticated));
}

#[test]
fn disposed_store_ignores_session_updates() {
    let mut h = harness();
    let store = h.store.clone();
    let notified = Rc::new(Cell::new(0));
    let counter = notified.clone();
    store.subscribe(move |_| counter.set(counter.get() + 1));
    store.dispose();
    store.update_session(Some(session_for("u1", Some("t1"), None)));
    h.pool.run_until_stalled();
    assert!(!store.snapshot().is_authenticated());
    assert_eq!(notified.get(), 0);
    assert_eq!(h.backend.sync_calls.get(), 0);
}

// =============================================================
// Session updates
// =============================================================

#[test]
fn signing_out_after_sequence_evicts_last_user_slot() {
    let h = harness();
    let store = h.store.clone();
    let cache = ProfileCache::new(h.storage.clone(), crate::config::DEFAULT_CACHE_PREFIX, 60_000);
    cache.write_at("u1", &profile("One", None), T0);
    cache.write_at("u2", &profile("Two", None), T0);

    store.update_session(Some(session_for("u1", Some("t1"), None)));
    store.update_session(Some(session_for("u2", Some("t2"), None)));
    assert_eq!(store.snapshot().profile, Some(profile("Two", None)));
    store.update_session(None);

    let state = store.snapshot();
    assert_eq!(state.status, AuthStatus::Unauthenticated);
    assert!(state.current_room.is_none());
    assert!(state.profile.is_none());
    assert!(h.storage.get(&cache_key("u2")).is_none());
    assert!(h.storage.get(&cache_key("u1")).is_some());
}

#[test]
fn signing_out_with_no_known_user_sweeps_namespace() {
    let h = harness();
    h.storage.set(&cache_key("u1"), "{}");
    h.storage.set("theme", "dark");
    h.store.update_session(None);
    assert_eq!(h.storage.keys(), vec!["theme".to_owned()]);
}

#[test]
fn session_without_user_is_treated_as_signed_out() {
    let h = harness();
    let mut session = session_for("u1", Some("t1"), None);
    session.user = None;
    h.store.update_session(Some(session));
    assert_eq!(h.store.snapshot().status, AuthStatus::Unauthenticated);
    assert!(h.store.snapshot().session.is_none());
}

#[test]
fn cached_profile_is_loaded_on_session_update() {
    let h = harness();
    let cache = ProfileCache::new(h.storage.clone(), crate::config::DEFAULT_CACHE_PREFIX, 60_000);
    cache.write_at("u1", &profile("Cached", None), T0);
    h.store.update_session(Some(session_for("u1", Some("t1"), None)));
    assert_eq!(h.store.snapshot().display_name(), "Cached");
}

#[test]
fn profile_from_me_drives_display_name() {
    let mut h = harness();
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", Some("t1"), Some("bob@example.com"))));
    assert_eq!(store.snapshot().display_name(), "bob");

    h.pool.run_until_stalled();
    assert_eq!(h.backend.sync_calls.get(), 1);
    assert_eq!(h.backend.me_calls.get(), 1);
    assert_eq!(store.snapshot().display_name(), "Alice");
    assert!(h.storage.get(&cache_key("u1")).is_some());
}

#[test]
fn session_without_token_skips_background_work() {
    let mut h = harness();
    h.store.update_session(Some(session_for("u1", None, None)));
    h.pool.run_until_stalled();
    assert!(h.store.snapshot().is_authenticated());
    assert_eq!(h.backend.sync_calls.get(), 0);
    assert_eq!(h.backend.room_calls.get(), 0);
}

#[test]
fn sync_sends_psn_id_from_metadata() {
    let mut h = harness();
    let mut session = session_for("u1", Some("t1"), None);
    if let Some(user) = session.user.as_mut() {
        user.user_metadata.psn_id = Some("HUNTER_1".to_owned());
    }
    h.store.update_session(Some(session));
    h.pool.run_until_stalled();
    assert_eq!(h.backend.last_sync_psn.borrow().as_deref(), Some("HUNTER_1"));
}

// =============================================================
// Sync cool-down and coalescing
// =============================================================

#[test]
fn sync_twice_within_cooldown_makes_one_call() {
    let mut h = harness();
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", None, None)));
    h.pool.run_until(store.sync_user("t1"));
    h.clock.advance(1_000);
    h.pool.run_until(store.sync_user("t1"));
    assert_eq!(h.backend.sync_calls.get(), 1);

    h.clock.advance(5_000);
    h.pool.run_until(store.sync_user("t1"));
    assert_eq!(h.backend.sync_calls.get(), 2);
}

#[test]
fn failed_sync_also_starts_cooldown() {
    let mut h = harness();
    *h.backend.sync_result.borrow_mut() = Err(ApiError::Network("down".to_owned()));
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", None, None)));
    h.pool.run_until(store.sync_user("t1"));
    h.pool.run_until(store.sync_user("t1"));
    assert_eq!(h.backend.sync_calls.get(), 1);
    assert_eq!(h.backend.me_calls.get(), 0);
}

#[test]
fn concurrent_syncs_share_one_request() {
    let mut h = harness();
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", None, None)));
    let release = h.backend.gate.hold();
    h.pool.run_until(async {
        let first = store.sync_user("t1");
        let second = store.sync_user("t1");
        let open = async move {
            let _ = release.send(());
        };
        futures::join!(first, second, open);
    });
    assert_eq!(h.backend.sync_calls.get(), 1);
}

// =============================================================
// Profile fetch
// =============================================================

#[test]
fn failed_profile_fetch_leaves_state_untouched() {
    let mut h = harness();
    let cache = ProfileCache::new(h.storage.clone(), crate::config::DEFAULT_CACHE_PREFIX, 60_000);
    cache.write_at("u1", &profile("Cached", None), T0);
    *h.backend.me_result.borrow_mut() = Err(ApiError::Status { status: 500, code: None, message: None });
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", None, None)));
    assert_eq!(h.pool.run_until(store.fetch_db_user("t1")), None);
    assert_eq!(store.snapshot().display_name(), "Cached");
}

#[test]
fn profile_for_previous_user_is_dropped() {
    let mut h = harness();
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", None, None)));
    let release = h.backend.gate.hold();
    h.pool.run_until(async {
        let fetch = store.fetch_db_user("t1");
        let switch = async {
            store.update_session(Some(session_for("u2", None, None)));
            let _ = release.send(());
        };
        futures::join!(fetch, switch);
    });
    assert_eq!(store.snapshot().user_id(), Some("u2"));
    assert!(store.snapshot().profile.is_none());
    assert!(h.storage.get(&cache_key("u1")).is_none());
}

// =============================================================
// Current room
// =============================================================

#[test]
fn concurrent_room_fetches_share_one_request() {
    let mut h = harness();
    *h.backend.room_result.borrow_mut() = Ok(Some(room("r1")));
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", None, None)));
    let release = h.backend.gate.hold();
    let (a, b) = h.pool.run_until(async {
        let first = store.fetch_current_room();
        let second = store.fetch_current_room();
        let open = async move {
            let _ = release.send(());
        };
        let (a, b, ()) = futures::join!(first, second, open);
        (a, b)
    });
    assert_eq!(h.backend.room_calls.get(), 1);
    assert_eq!(a, Some(room("r1")));
    assert_eq!(b, Some(room("r1")));
    let state = store.snapshot();
    assert_eq!(state.current_room, Some(room("r1")));
    assert!(!state.room_loading);
}

#[test]
fn room_fetch_requires_authentication() {
    let mut h = harness();
    let store = h.store.clone();
    assert_eq!(h.pool.run_until(store.fetch_current_room()), None);
    assert_eq!(h.backend.room_calls.get(), 0);
}

#[test]
fn successful_room_fetch_is_not_repeated_for_same_user() {
    let mut h = harness();
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", Some("t1"), None)));
    h.pool.run_until_stalled();
    store.update_session(Some(session_for("u1", Some("t1b"), None)));
    h.pool.run_until_stalled();
    assert_eq!(h.backend.room_calls.get(), 1);
}

#[test]
fn failed_room_fetch_retries_on_next_session_update() {
    let mut h = harness();
    *h.backend.room_result.borrow_mut() = Err(ApiError::Network("down".to_owned()));
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", Some("t1"), None)));
    h.pool.run_until_stalled();
    let state = store.snapshot();
    assert!(state.current_room.is_none());
    assert!(!state.room_loading);

    *h.backend.room_result.borrow_mut() = Ok(Some(room("r9")));
    store.update_session(Some(session_for("u1", Some("t1"), None)));
    h.pool.run_until_stalled();
    assert_eq!(h.backend.room_calls.get(), 2);
    assert_eq!(store.snapshot().current_room, Some(room("r9")));
}

#[test]
fn leave_without_room_makes_no_call() {
    let mut h = harness();
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", None, None)));
    assert!(!h.pool.run_until(store.leave_current_room()));
    assert_eq!(h.backend.leave_calls.get(), 0);
}

#[test]
fn leave_clears_room_on_success_and_keeps_it_on_failure() {
    let mut h = harness();
    *h.backend.room_result.borrow_mut() = Ok(Some(room("r1")));
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", None, None)));
    h.pool.run_until(store.fetch_current_room());

    *h.backend.leave_result.borrow_mut() = Err(ApiError::Network("down".to_owned()));
    assert!(!h.pool.run_until(store.leave_current_room()));
    assert_eq!(store.snapshot().current_room, Some(room("r1")));

    *h.backend.leave_result.borrow_mut() = Ok(());
    assert!(h.pool.run_until(store.leave_current_room()));
    assert!(store.snapshot().current_room.is_none());
    assert_eq!(h.backend.leave_calls.get(), 2);
}

// =============================================================
// User-initiated actions
// =============================================================

#[test]
fn update_psn_id_without_token_requires_authentication() {
    let mut h = harness();
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", None, None)));
    let result = h.pool.run_until(store.update_psn_id("HUNTER123"));
    assert_eq!(result, Err(StoreError::AuthenticationRequired));
    assert_eq!(h.backend.psn_calls.get(), 0);
}

#[test]
fn update_psn_id_validates_then_updates_profile() {
    let mut h = harness();
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", Some("t1"), None)));
    h.pool.run_until_stalled();
    assert!(store.snapshot().needs_onboarding());

    let bad = h.pool.run_until(store.update_psn_id("no spaces"));
    assert!(matches!(bad, Err(StoreError::Validation(_))));
    assert!(store.snapshot().error.is_some());
    assert_eq!(h.backend.psn_calls.get(), 0);

    let profile = h.pool.run_until(store.update_psn_id("HUNTER123")).unwrap();
    assert_eq!(profile.psn_online_id.as_deref(), Some("HUNTER123"));
    let state = store.snapshot();
    assert!(!state.needs_onboarding());
    assert!(state.error.is_none());
    assert!(!state.loading);
}

#[test]
fn sign_in_applies_session_and_broadcasts() {
    let mut h = harness();
    let store = h.store.clone();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    store.on_auth_change(move |event, session| sink.borrow_mut().push((event, session.is_some())));

    h.pool.run_until(store.sign_in("bob@example.com", "secret1")).unwrap();
    let state = store.snapshot();
    assert!(state.is_authenticated());
    assert!(!state.loading);
    assert_eq!(*events.borrow(), vec![(AuthEvent::SignedIn, true)]);
}

#[test]
fn sign_in_failure_sets_error_and_resets_loading() {
    let auth = MockAuth::with_session(None);
    *auth.sign_in_result.borrow_mut() = Err(AuthError::Rejected("Invalid login credentials".to_owned()));
    let mut h = harness_with(auth);
    let store = h.store.clone();
    let result = h.pool.run_until(store.sign_in("bob@example.com", "secret1"));
    assert!(matches!(result, Err(StoreError::Auth(AuthError::Rejected(_)))));
    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("Invalid login credentials"));
    assert!(!state.loading);
    assert!(!state.is_authenticated());
}

#[test]
fn sign_in_rejects_malformed_email_before_provider() {
    let mut h = harness();
    let store = h.store.clone();
    let result = h.pool.run_until(store.sign_in("bob", "secret1"));
    assert_eq!(result, Err(StoreError::Validation("Please enter a valid email address".to_owned())));
}

#[test]
fn sign_up_pending_confirmation_keeps_user_signed_out() {
    let mut h = harness();
    let store = h.store.clone();
    let issued = h
        .pool
        .run_until(store.sign_up("bob@example.com", "secret1", serde_json::json!({ "psn_id": "BOB" })))
        .unwrap();
    assert!(!issued);
    assert!(!store.snapshot().is_authenticated());
}

#[test]
fn sign_out_clears_state_even_when_provider_fails() {
    let auth = MockAuth::with_session(None);
    *auth.sign_out_result.borrow_mut() = Err(AuthError::Network("offline".to_owned()));
    let mut h = harness_with(auth);
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", Some("t1"), None)));
    let result = h.pool.run_until(store.sign_out());
    assert!(result.is_err());
    let state = store.snapshot();
    assert!(!state.is_authenticated());
    assert!(state.profile.is_none());
}

#[test]
fn refresh_swaps_token_and_broadcasts() {
    let mut h = harness();
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", Some("t1"), None)));
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    store.on_auth_change(move |event, _| sink.borrow_mut().push(event));

    h.pool.run_until(store.refresh_session()).unwrap();
    let state = store.snapshot();
    assert_eq!(state.access_token(), Some("t2"));
    assert!(!state.loading);
    assert_eq!(*events.borrow(), vec![AuthEvent::TokenRefreshed]);
}

#[test]
fn initial_session_event_is_not_broadcast() {
    let h = harness();
    let events = Rc::new(Cell::new(0));
    let counter = events.clone();
    h.store.on_auth_change(move |_, _| counter.set(counter.get() + 1));
    h.store.handle_auth_event(AuthEvent::InitialSession, Some(session_for("u1", None, None)));
    assert_eq!(events.get(), 0);
    assert!(h.store.snapshot().is_authenticated());
    h.store.handle_auth_event(AuthEvent::SignedOut, None);
    assert_eq!(events.get(), 1);
}

#[test]
fn unsubscribed_listener_is_not_called() {
    let h = harness();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let id = h.store.subscribe(move |_| counter.set(counter.get() + 1));
    h.store.update_session(None);
    h.store.unsubscribe(id);
    h.store.update_session(None);
    assert_eq!(calls.get(), 1);
}

#[test]
fn handle_unauthorized_reports_whether_session_survived() {
    let mut h = harness_with(MockAuth::with_session(Some(session_for("u1", None, None))));
    let store = h.store.clone();
    assert!(h.pool.run_until(store.handle_unauthorized()));
    *h.auth.session.borrow_mut() = Ok(None);
    assert!(!h.pool.run_until(store.handle_unauthorized()));
}

// =============================================================
// Rooms
// =============================================================

#[test]
fn room_actions_require_token() {
    let mut h = harness();
    let store = h.store.clone();
    assert_eq!(h.pool.run_until(store.room_status()), Err(StoreError::AuthenticationRequired));
    let form = CreateRoomForm::default();
    assert_eq!(h.pool.run_until(store.create_room(&form)), Err(StoreError::AuthenticationRequired));
    assert_eq!(h.backend.status_calls.get() + h.backend.create_calls.get(), 0);
}

#[test]
fn create_room_validates_and_refreshes_current_room() {
    let mut h = harness();
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", Some("t1"), None)));
    h.pool.run_until_stalled();

    let invalid = h.pool.run_until(store.create_room(&CreateRoomForm::default()));
    assert!(matches!(invalid, Err(StoreError::Validation(_))));
    assert_eq!(h.backend.create_calls.get(), 0);

    *h.backend.room_result.borrow_mut() = Ok(Some(room("new")));
    let form = CreateRoomForm {
        name: "Hunt".to_owned(),
        game_version_id: "1".to_owned(),
        max_players: "4".to_owned(),
        ..CreateRoomForm::default()
    };
    h.pool.run_until(store.create_room(&form)).unwrap();
    assert_eq!(store.snapshot().current_room, Some(room("new")));
}

#[test]
fn host_conflict_surfaces_error_code() {
    let mut h = harness();
    *h.backend.create_result.borrow_mut() = Err(crate::net::api::error_from_body(409, r#"{"error":"HOST_ROOM_ACTIVE"}"#));
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", Some("t1"), None)));
    let form = CreateRoomForm {
        name: "Hunt".to_owned(),
        game_version_id: "1".to_owned(),
        max_players: "4".to_owned(),
        ..CreateRoomForm::default()
    };
    match h.pool.run_until(store.create_room(&form)) {
        Err(StoreError::Api(e)) => assert_eq!(e.code(), Some("HOST_ROOM_ACTIVE")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn join_needing_confirmation_does_not_refresh_room() {
    let mut h = harness();
    let store = h.store.clone();
    store.update_session(Some(session_for("u1", Some("t1"), None)));
    h.pool.run_until_stalled();
    let before = h.backend.room_calls.get();

    *h.backend.join_result.borrow_mut() = Ok(RoomActionResponse {
        warning: Some("USER_BLOCKING_HOST".to_owned()),
        requires_confirmation: true,
        ..RoomActionResponse::default()
    });
    let resp = h.pool.run_until(store.join_room("r1", &JoinRoomRequest::default())).unwrap();
    assert!(resp.needs_block_confirmation());
    assert_eq!(h.backend.room_calls.get(), before);

    *h.backend.join_result.borrow_mut() = Ok(RoomActionResponse::default());
    h.pool.run_until(store.join_room("r1", &JoinRoomRequest { confirm_join: true, ..JoinRoomRequest::default() }))
        .unwrap();
    assert_eq!(h.backend.room_calls.get(), before + 1);
}

#[test]
fn game_versions_are_cached_after_first_load() {
    let mut h = harness();
    let store = h.store.clone();
    let first = h.pool.run_until(store.game_versions()).unwrap();
    let second = h.pool.run_until(store.game_versions()).unwrap();
    assert_eq!(first, second);
    assert_eq!(h.backend.version_calls.get(), 1);
}

// =============================================================
// Token refresh timer
// =============================================================

#[test]
fn refresh_delay_subtracts_margin_and_clamps() {
    assert_eq!(refresh_delay_ms(1_000, 900_000, 60_000), 40_000);
    assert_eq!(refresh_delay_ms(1_000, 990_000, 60_000), 0);
}

#[test]
fn expiring_session_arms_timer_before_expiry() {
    let h = harness();
    h.store.update_session(Some(expiring_session("u1", "t1")));
    assert_eq!(h.timers.delays(), vec![3_540_000]);

    h.store.update_session(Some(session_for("u1", Some("t1"), None)));
    assert_eq!(h.timers.delays().len(), 1);
}

#[test]
fn timer_refresh_swaps_token_and_rearms() {
    let auth = MockAuth::with_session(None);
    *auth.refresh_result.borrow_mut() = Ok(Some(expiring_session("u1", "t2")));
    let mut h = harness_with(auth);
    let store = h.store.clone();
    store.update_session(Some(expiring_session("u1", "t1")));

    h.timers.fire_all();
    h.pool.run_until_stalled();
    assert_eq!(h.auth.refresh_calls.get(), 1);
    assert_eq!(store.snapshot().access_token(), Some("t2"));
    assert_eq!(h.timers.delays().len(), 1);
}

#[test]
fn failed_timer_refresh_leaves_loading_and_error_alone() {
    let auth = MockAuth::with_session(None);
    *auth.refresh_result.borrow_mut() = Err(AuthError::Network("offline".to_owned()));
    let mut h = harness_with(auth);
    let store = h.store.clone();
    store.update_session(Some(expiring_session("u1", "t1")));
    h.pool.run_until_stalled();
    let saw_loading = Rc::new(Cell::new(false));
    let seen = saw_loading.clone();
    store.subscribe(move |state| seen.set(seen.get() || state.loading));

    h.timers.fire_all();
    h.pool.run_until_stalled();
    assert_eq!(h.auth.refresh_calls.get(), 1);
    assert!(!saw_loading.get());
    let state = store.snapshot();
    assert!(state.error.is_none());
    assert!(state.is_authenticated());
    assert_eq!(state.access_token(), Some("t1"));
}

#[test]
fn rejected_timer_refresh_signs_out() {
    let auth = MockAuth::with_session(None);
    *auth.refresh_result.borrow_mut() = Err(AuthError::Rejected("Invalid Refresh Token".to_owned()));
    let mut h = harness_with(auth);
    let store = h.store.clone();
    store.update_session(Some(expiring_session("u1", "t1")));
    h.pool.run_until_stalled();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    store.on_auth_change(move |event, session| sink.borrow_mut().push((event, session.is_some())));

    h.timers.fire_all();
    h.pool.run_until_stalled();
    let state = store.snapshot();
    assert!(!state.is_authenticated());
    assert!(state.session.is_none());
    assert!(state.error.is_none());
    assert!(!state.loading);
    assert!(h.storage.get(&cache_key("u1")).is_none());
    assert_eq!(*events.borrow(), vec![(AuthEvent::SignedOut, false)]);
}

#[test]
fn superseded_timer_stands_down() {
    let mut h = harness();
    h.store.update_session(Some(expiring_session("u1", "t1")));
    h.store.update_session(Some(expiring_session("u1", "t1b")));
    assert_eq!(h.timers.delays().len(), 2);

    h.timers.fire_all();
    h.pool.run_until_stalled();
    assert_eq!(h.auth.refresh_calls.get(), 1);
}

#[test]
fn sign_out_and_dispose_cancel_pending_timer() {
    let mut h = harness();
    h.store.update_session(Some(expiring_session("u1", "t1")));
    h.store.update_session(None);
    h.timers.fire_all();
    h.pool.run_until_stalled();
    assert_eq!(h.auth.refresh_calls.get(), 0);

    h.store.update_session(Some(expiring_session("u1", "t1")));
    h.store.dispose();
    h.timers.fire_all();
    h.pool.run_until_stalled();
    assert_eq!(h.auth.refresh_calls.get(), 0);
}
