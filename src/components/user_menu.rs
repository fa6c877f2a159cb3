//! Header user menu: avatar, display name, and sign-out.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered in every page header. Anonymous visitors get a login link; signed
//! in users get a dropdown driven by `UiState`.

use leptos::prelude::*;

use crate::app::StoreHandle;
use crate::config::DEFAULT_AVATAR_URL;
use crate::state::auth::AuthState;
use crate::state::ui::UiState;
use crate::util::auth::LOGIN_PATH;

#[component]
pub fn UserMenu() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let store = expect_context::<StoreHandle>();

    let avatar = move || {
        let default_avatar = store
            .with_value(|s| s.as_ref().map(|s| s.config().default_avatar.clone()))
            .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_owned());
        auth.get().avatar_url(&default_avatar)
    };

    let on_sign_out = move |_| {
        ui.update(UiState::close_menus);
        #[cfg(feature = "hydrate")]
        {
            let Some(store) = store.get_value() else {
                return;
            };
            leptos::task::spawn_local(async move {
                if let Err(e) = store.sign_out().await {
                    log::warn!("sign out: {e}");
                }
                crate::pages::login::navigate_to(LOGIN_PATH);
            });
        }
    };

    view! {
        <div class="user-menu">
            <Show
                when=move || auth.get().is_authenticated()
                fallback=|| view! { <a class="btn user-menu__login" href=LOGIN_PATH>"Sign in"</a> }
            >
                <button class="user-menu__toggle" on:click=move |_| ui.update(UiState::toggle_user_menu)>
                    <img class="user-menu__avatar" src=avatar alt="" />
                    <span class="user-menu__name">{move || auth.get().display_name()}</span>
                </button>
                <Show when=move || ui.get().user_menu_open>
                    <div class="user-menu__dropdown">
                        <Show when=move || auth.get().psn_id().is_some()>
                            <span class="user-menu__psn">
                                {move || auth.get().psn_id().map(ToOwned::to_owned).unwrap_or_default()}
                            </span>
                        </Show>
                        <button class="user-menu__item" on:click=on_sign_out>"Sign out"</button>
                    </div>
                </Show>
            </Show>
        </div>
    }
}
