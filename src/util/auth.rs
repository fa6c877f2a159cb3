//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical redirect behavior: anonymous users
//! go to the login page, signed-in users without a PSN id go to onboarding.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::AuthState;

pub const LOGIN_PATH: &str = "/auth/login";
pub const ONBOARDING_PATH: &str = "/auth/complete-profile";

/// Auth has settled and nobody is signed in.
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    state.is_initialized() && !state.loading && !state.is_authenticated()
}

/// Signed in, profile loaded, PSN id missing, and not already on the form.
pub fn should_redirect_onboarding(state: &AuthState, current_path: &str) -> bool {
    state.is_initialized() && state.needs_onboarding() && current_path != ONBOARDING_PATH
}

/// Redirect to the login page whenever auth has loaded and no user is present.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let state = auth.get();
        if should_redirect_unauth(&state) {
            navigate(LOGIN_PATH, NavigateOptions::default());
        }
    });
}

/// Redirect signed-in users without a PSN id to the onboarding form.
pub fn install_onboarding_redirect<F>(auth: RwSignal<AuthState>, current_path: Memo<String>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let state = auth.get();
        if should_redirect_onboarding(&state, &current_path.get()) {
            navigate(ONBOARDING_PATH, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
