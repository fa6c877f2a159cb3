use super::*;
use crate::net::types::{Profile, Session, SessionUser};
use crate::state::auth::AuthStatus;

fn authenticated(psn: Option<&str>) -> AuthState {
    AuthState {
        status: AuthStatus::Authenticated,
        session: Some(Session {
            access_token: Some("t1".to_owned()),
            refresh_token: None,
            expires_at: None,
            expires_in: None,
            token_type: None,
            user: Some(SessionUser { id: "u1".to_owned(), email: None, user_metadata: Default::default() }),
        }),
        profile: Some(Profile { psn_online_id: psn.map(str::to_owned), ..Profile::default() }),
        ..AuthState::default()
    }
}

#[test]
fn should_redirect_unauth_when_settled_and_user_missing() {
    let state = AuthState { status: AuthStatus::Unauthenticated, ..AuthState::default() };
    assert!(should_redirect_unauth(&state));
}

#[test]
fn should_not_redirect_while_checking_or_loading() {
    let checking = AuthState { status: AuthStatus::Checking, ..AuthState::default() };
    assert!(!should_redirect_unauth(&checking));
    let loading = AuthState { status: AuthStatus::Unauthenticated, loading: true, ..AuthState::default() };
    assert!(!should_redirect_unauth(&loading));
}

#[test]
fn should_not_redirect_when_user_exists() {
    assert!(!should_redirect_unauth(&authenticated(Some("HUNTER"))));
}

#[test]
fn onboarding_redirect_when_psn_missing() {
    assert!(should_redirect_onboarding(&authenticated(None), "/rooms"));
    assert!(!should_redirect_onboarding(&authenticated(None), ONBOARDING_PATH));
    assert!(!should_redirect_onboarding(&authenticated(Some("HUNTER")), "/rooms"));
}
