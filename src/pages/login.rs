//! Login page supporting email + password sign-in, sign-up, and password reset.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::app::StoreHandle;
use crate::state::auth::AuthState;
use crate::util::validation::{validate_email, validate_password, validate_psn_id};

/// Which form the login card shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoginMode {
    #[default]
    SignIn,
    SignUp,
    Reset,
}

/// First validation failure for the current mode, if any.
pub fn login_form_error(mode: LoginMode, email: &str, password: &str, psn_id: &str) -> Option<&'static str> {
    validate_email(email.trim()).err().or_else(|| match mode {
        LoginMode::SignIn => validate_password(password).err(),
        LoginMode::SignUp => validate_password(password).err().or_else(|| validate_psn_id(psn_id.trim()).err()),
        LoginMode::Reset => None,
    })
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let store = expect_context::<StoreHandle>();
    let mode = RwSignal::new(LoginMode::SignIn);
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let psn_id = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.get_untracked().loading {
            return;
        }
        let current_mode = mode.get_untracked();
        let email_value = email.get_untracked().trim().to_owned();
        let password_value = password.get_untracked();
        let psn_value = psn_id.get_untracked().trim().to_owned();
        if let Some(message) = login_form_error(current_mode, &email_value, &password_value, &psn_value) {
            info.set(message.to_owned());
            return;
        }
        info.set(String::new());

        #[cfg(feature = "hydrate")]
        {
            let Some(store) = store.get_value() else {
                info.set("Still loading. Please try again in a moment.".to_owned());
                return;
            };
            leptos::task::spawn_local(async move {
                match current_mode {
                    LoginMode::SignIn => {
                        if store.sign_in(&email_value, &password_value).await.is_ok() {
                            navigate_to("/rooms");
                        }
                    }
                    LoginMode::SignUp => {
                        let metadata = serde_json::json!({ "psn_id": psn_value });
                        match store.sign_up(&email_value, &password_value, metadata).await {
                            Ok(true) => navigate_to("/rooms"),
                            Ok(false) => info.set("Check your email to confirm your account.".to_owned()),
                            Err(_) => {}
                        }
                    }
                    LoginMode::Reset => {
                        if store.reset_password(&email_value).await.is_ok() {
                            info.set("Password reset email sent.".to_owned());
                        }
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (store, current_mode, email_value, password_value, psn_value);
        }
    };

    let title = move || match mode.get() {
        LoginMode::SignIn => "Sign in",
        LoginMode::SignUp => "Create account",
        LoginMode::Reset => "Reset password",
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"MHP Rooms"</h1>
                <p class="login-card__subtitle">{title}</p>
                <Show when=move || auth.get().config_error.is_some()>
                    <p class="login-message login-message--error">
                        {move || auth.get().config_error.unwrap_or_default()}
                    </p>
                </Show>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <Show when=move || mode.get() != LoginMode::Reset>
                        <input
                            class="login-input"
                            type="password"
                            placeholder="Password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </Show>
                    <Show when=move || mode.get() == LoginMode::SignUp>
                        <input
                            class="login-input"
                            type="text"
                            maxlength="16"
                            placeholder="PSN ID"
                            prop:value=move || psn_id.get()
                            on:input=move |ev| psn_id.set(event_target_value(&ev))
                        />
                    </Show>
                    <button class="login-button" type="submit" disabled=move || auth.get().loading>
                        {title}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <Show when=move || auth.get().error.is_some()>
                    <p class="login-message login-message--error">{move || auth.get().error.unwrap_or_default()}</p>
                </Show>
                <div class="login-divider"></div>
                <div class="login-links">
                    <button class="login-link" on:click=move |_| mode.set(LoginMode::SignIn)>"Sign in"</button>
                    <button class="login-link" on:click=move |_| mode.set(LoginMode::SignUp)>"Create account"</button>
                    <button class="login-link" on:click=move |_| mode.set(LoginMode::Reset)>"Forgot password?"</button>
                </div>
            </div>
        </div>
    }
}

/// Full page navigation so server-rendered pages pick up the session cookie.
#[cfg(feature = "hydrate")]
pub(crate) fn navigate_to(path: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(path);
    }
}
