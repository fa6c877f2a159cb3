//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store holds `Rc` state and cannot live in a `Send` context, so
//! it is shared as a local [`StoredValue`]. Its state is mirrored into an
//! `RwSignal<AuthState>` that components read reactively. The store is built
//! after the auth provider settings arrive, so the handle starts empty.

use leptos::prelude::*;
use leptos_meta::{Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::pages::{complete_profile::CompleteProfilePage, login::LoginPage, rooms::RoomsPage};
use crate::state::{auth::AuthState, session_store::SessionStore, ui::UiState};

/// Context handle for the session store. Holds `None` until it has been
/// built; event handlers read it with `get_value()`.
pub type StoreHandle = StoredValue<Option<SessionStore>, LocalStorage>;

/// Root application component.
///
/// Provides auth, UI and store contexts and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    let ui = RwSignal::new(UiState::default());
    let store: StoreHandle = StoredValue::new_local(None);

    provide_context(auth);
    provide_context(ui);
    provide_context(store);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let session_store = browser::build_store().await;
        session_store.subscribe(move |state| auth.set(state.clone()));
        store.set_value(Some(session_store.clone()));
        session_store.init().await;
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/mhp-rooms.css"/>
        <Title text="MHP Rooms"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=RoomsPage/>
                <Route path=StaticSegment("rooms") view=RoomsPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("login")) view=LoginPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("complete-profile")) view=CompleteProfilePage/>
            </Routes>
        </Router>
    }
}

#[cfg(feature = "hydrate")]
mod browser {
    use std::rc::Rc;

    use futures::FutureExt;
    use futures::future::LocalBoxFuture;

    use crate::config::ClientConfig;
    use crate::net::api::HttpBackend;
    use crate::net::auth_provider::{fetch_auth_config, provider_from_config};
    use crate::state::session_store::{SessionStore, StoreServices};
    use crate::util::clock::{Clock, SystemClock};
    use crate::util::storage::{BrowserStorage, KeyValueStore};

    /// Load provider settings and assemble the browser store.
    pub async fn build_store() -> SessionStore {
        let config = ClientConfig::default();
        let storage: Rc<dyn KeyValueStore> = Rc::new(BrowserStorage);
        let clock: Rc<dyn Clock> = Rc::new(SystemClock);
        let auth = provider_from_config(fetch_auth_config(&config.api_base).await, Rc::clone(&storage), Rc::clone(&clock));
        let services = StoreServices {
            auth,
            backend: Rc::new(HttpBackend::new(config.clone())),
            storage,
            clock,
            spawner: Rc::new(|work: LocalBoxFuture<'static, ()>| wasm_bindgen_futures::spawn_local(work)),
            sleeper: Rc::new(|ms: u32| gloo_timers::future::TimeoutFuture::new(ms).boxed_local()),
        };
        SessionStore::new(services, config)
    }
}
