//! Rooms page: header chrome, current room banner, create and join entry points.
//!
//! SYSTEM CONTEXT
//! ==============
//! Listing itself is server-rendered; this page drives the interactive parts.
//! Creating a room checks the caller's room status first. Joining by room id
//! walks through the confirmation steps `join_outcome` classifies.
//!
//! ERROR HANDLING
//! ==============
//! A 401 from any room call asks the store to re-check the session before the
//! login prompt is shown.

#[cfg(test)]
#[path = "rooms_test.rs"]
mod rooms_test;

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::app::StoreHandle;
use crate::components::current_room_banner::CurrentRoomBanner;
use crate::components::room_create_dialog::RoomCreateDialog;
use crate::components::user_menu::UserMenu;
use crate::net::types::{GameVersion, JoinRoomRequest};
use crate::state::auth::AuthState;
use crate::state::room_create::{JoinOutcome, RoomCreateFlow};
use crate::util::auth::{LOGIN_PATH, install_onboarding_redirect};

/// Join dialog step after a join attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum JoinPrompt {
    #[default]
    None,
    ConfirmBlocked(String),
    ConfirmLeave,
    HostRestricted,
    LoginRequired,
    Error(String),
}

/// Where the page goes after a join attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JoinNext {
    Prompt(JoinPrompt),
    Visit(String),
}

/// Map a join outcome to the prompt to show or the page to visit.
pub fn join_next(outcome: JoinOutcome, room_id: &str) -> JoinNext {
    let prompt = match outcome {
        JoinOutcome::Joined { redirect } => {
            return JoinNext::Visit(redirect.unwrap_or_else(|| format!("/rooms/{room_id}")));
        }
        JoinOutcome::ConfirmBlocked { message } => JoinPrompt::ConfirmBlocked(
            message.unwrap_or_else(|| "You have blocked the host of this room. Join anyway?".to_owned()),
        ),
        JoinOutcome::HostRestricted => JoinPrompt::HostRestricted,
        JoinOutcome::ConfirmLeaveCurrent => JoinPrompt::ConfirmLeave,
        JoinOutcome::LoginRequired => JoinPrompt::LoginRequired,
        JoinOutcome::Failed(message) => JoinPrompt::Error(message),
    };
    JoinNext::Prompt(prompt)
}

#[component]
pub fn RoomsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let store = expect_context::<StoreHandle>();
    let navigate = use_navigate();
    let location = use_location();
    let path = Memo::new(move |_| location.pathname.get());
    install_onboarding_redirect(auth, path, navigate);

    let flow = RwSignal::new(RoomCreateFlow::default());
    let versions = RwSignal::new(Vec::<GameVersion>::new());
    let room_id = RwSignal::new(String::new());
    let join_password = RwSignal::new(String::new());
    let prompt = RwSignal::new(JoinPrompt::None);

    let on_create = move |_| {
        if !auth.get_untracked().is_authenticated() {
            #[cfg(feature = "hydrate")]
            crate::pages::login::navigate_to(LOGIN_PATH);
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            let Some(store) = store.get_value() else {
                return;
            };
            leptos::task::spawn_local(async move {
                let status = store.room_status().await;
                if let Err(e) = &status {
                    if is_unauthorized(e) && !store.handle_unauthorized().await {
                        crate::pages::login::navigate_to(LOGIN_PATH);
                        return;
                    }
                }
                flow.update(|f| f.open_with_status(status));
                match store.game_versions().await {
                    Ok(list) => versions.set(list),
                    Err(e) => log::warn!("game versions: {e}"),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (store, flow, versions);
        }
    };

    let attempt_join = move |request: JoinRoomRequest| {
        let id = room_id.get_untracked().trim().to_owned();
        if id.is_empty() {
            prompt.set(JoinPrompt::Error("Please enter a room ID".to_owned()));
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            let Some(store) = store.get_value() else {
                return;
            };
            leptos::task::spawn_local(async move {
                let result = store.join_room(&id, &request).await;
                if let Err(e) = &result {
                    if is_unauthorized(e) {
                        store.handle_unauthorized().await;
                    }
                }
                match join_next(crate::state::room_create::join_outcome(result), &id) {
                    JoinNext::Prompt(next) => prompt.set(next),
                    JoinNext::Visit(target) => crate::pages::login::navigate_to(&target),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (store, request, id);
        }
    };

    let password = move || {
        let value = join_password.get_untracked();
        (!value.is_empty()).then_some(value)
    };

    let on_join = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        prompt.set(JoinPrompt::None);
        attempt_join(JoinRoomRequest { password: password(), ..JoinRoomRequest::default() });
    };
    let on_confirm_leave = move |_| {
        prompt.set(JoinPrompt::None);
        attempt_join(JoinRoomRequest { password: password(), force_join: true, ..JoinRoomRequest::default() });
    };
    let on_confirm_blocked = move |_| {
        prompt.set(JoinPrompt::None);
        attempt_join(JoinRoomRequest { password: password(), confirm_join: true, ..JoinRoomRequest::default() });
    };

    let prompt_text = move || match prompt.get() {
        JoinPrompt::None => String::new(),
        JoinPrompt::ConfirmBlocked(message) | JoinPrompt::Error(message) => message,
        JoinPrompt::ConfirmLeave => "You are in another room. Leave it and join this one?".to_owned(),
        JoinPrompt::HostRestricted => "You are hosting a room. Close it before joining another.".to_owned(),
        JoinPrompt::LoginRequired => "Please sign in to join rooms.".to_owned(),
    };

    view! {
        <div class="rooms-page">
            <header class="rooms-page__header">
                <a class="rooms-page__brand" href="/rooms">"MHP Rooms"</a>
                <span class="rooms-page__spacer"></span>
                <button class="btn btn--primary" on:click=on_create>"Create room"</button>
                <UserMenu/>
            </header>
            <CurrentRoomBanner/>
            <form class="rooms-page__join" on:submit=on_join>
                <input
                    class="rooms-page__input"
                    type="text"
                    placeholder="Room ID"
                    prop:value=move || room_id.get()
                    on:input=move |ev| room_id.set(event_target_value(&ev))
                />
                <input
                    class="rooms-page__input"
                    type="password"
                    placeholder="Password (if any)"
                    prop:value=move || join_password.get()
                    on:input=move |ev| join_password.set(event_target_value(&ev))
                />
                <button class="btn" type="submit">"Join"</button>
            </form>
            <Show when=move || prompt.get() != JoinPrompt::None>
                <div class="rooms-page__prompt">
                    <p>{prompt_text}</p>
                    <Show when=move || prompt.get() == JoinPrompt::ConfirmLeave>
                        <button class="btn btn--primary" on:click=on_confirm_leave>"Leave and join"</button>
                    </Show>
                    <Show when=move || matches!(prompt.get(), JoinPrompt::ConfirmBlocked(_))>
                        <button class="btn btn--primary" on:click=on_confirm_blocked>"Join anyway"</button>
                    </Show>
                    <Show when=move || prompt.get() == JoinPrompt::LoginRequired>
                        <a class="btn btn--primary" href=LOGIN_PATH>"Sign in"</a>
                    </Show>
                    <button class="btn" on:click=move |_| prompt.set(JoinPrompt::None)>"Close"</button>
                </div>
            </Show>
            <RoomCreateDialog flow=flow versions=versions/>
        </div>
    }
}

#[cfg(feature = "hydrate")]
fn is_unauthorized(err: &crate::state::session_store::StoreError) -> bool {
    use crate::state::session_store::StoreError;
    match err {
        StoreError::Api(api) => api.is_unauthorized(),
        StoreError::AuthenticationRequired => true,
        _ => false,
    }
}
