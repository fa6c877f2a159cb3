//! Banner for the room the signed-in user currently belongs to.

#[cfg(test)]
#[path = "current_room_banner_test.rs"]
mod current_room_banner_test;

use leptos::prelude::*;

use crate::app::StoreHandle;
use crate::state::auth::AuthState;

/// Message shown after a leave attempt, if it failed.
pub fn leave_failure_message(left: bool) -> Option<&'static str> {
    (!left).then_some("Could not leave the room. Please try again.")
}

#[component]
pub fn CurrentRoomBanner() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let store = expect_context::<StoreHandle>();
    let leaving = RwSignal::new(false);
    let leave_error = RwSignal::new(None::<&'static str>);

    let room_name = move || auth.get().current_room.map(|r| r.name).unwrap_or_default();
    let room_href = move || auth.get().current_room.map(|r| format!("/rooms/{}", r.id)).unwrap_or_default();

    let on_leave = move |_| {
        if leaving.get_untracked() {
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            let Some(store) = store.get_value() else {
                return;
            };
            leaving.set(true);
            leave_error.set(None);
            leptos::task::spawn_local(async move {
                let left = store.leave_current_room().await;
                leave_error.set(leave_failure_message(left));
                leaving.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = store;
        }
    };

    view! {
        <Show when=move || auth.get().is_authenticated() && auth.get().current_room.is_some()>
            <div class="current-room-banner">
                <span class="current-room-banner__label">"You are in "</span>
                <a class="current-room-banner__name" href=room_href>{room_name}</a>
                <button class="btn current-room-banner__leave" disabled=move || leaving.get() on:click=on_leave>
                    {move || if leaving.get() { "Leaving..." } else { "Leave" }}
                </button>
                <Show when=move || leave_error.get().is_some()>
                    <span class="current-room-banner__error">{move || leave_error.get().unwrap_or_default()}</span>
                </Show>
            </div>
        </Show>
    }
}
