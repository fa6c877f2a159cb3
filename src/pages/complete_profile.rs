//! Onboarding page: signed-in users without a PSN id register one here.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::StoreHandle;
use crate::state::auth::AuthState;
use crate::util::auth::install_unauth_redirect;
use crate::util::validation::validate_psn_id;

#[component]
pub fn CompleteProfilePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let store = expect_context::<StoreHandle>();
    let navigate = use_navigate();
    install_unauth_redirect(auth, navigate);

    let psn_id = RwSignal::new(String::new());
    let message = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let value = psn_id.get_untracked().trim().to_owned();
        if let Err(e) = validate_psn_id(&value) {
            message.set(e.to_owned());
            return;
        }
        message.set(String::new());

        #[cfg(feature = "hydrate")]
        {
            let Some(store) = store.get_value() else {
                return;
            };
            leptos::task::spawn_local(async move {
                if store.update_psn_id(&value).await.is_ok() {
                    crate::pages::login::navigate_to("/rooms");
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (store, value);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Complete your profile"</h1>
                <p class="login-card__subtitle">
                    {move || format!("Welcome, {}. Register your PSN ID to join rooms.", auth.get().display_name())}
                </p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        maxlength="16"
                        placeholder="PSN ID"
                        prop:value=move || psn_id.get()
                        on:input=move |ev| psn_id.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || auth.get().loading>
                        "Save"
                    </button>
                </form>
                <Show when=move || !message.get().is_empty()>
                    <p class="login-message login-message--error">{move || message.get()}</p>
                </Show>
                <Show when=move || auth.get().error.is_some()>
                    <p class="login-message login-message--error">{move || auth.get().error.unwrap_or_default()}</p>
                </Show>
            </div>
        </div>
    }
}
