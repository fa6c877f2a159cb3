use super::*;

// =============================================================================
// JOIN NAVIGATION
// =============================================================================

#[test]
fn joined_follows_redirect_or_room_page() {
    assert_eq!(
        join_next(JoinOutcome::Joined { redirect: Some("/rooms/abc/lobby".to_owned()) }, "abc"),
        JoinNext::Visit("/rooms/abc/lobby".to_owned())
    );
    assert_eq!(join_next(JoinOutcome::Joined { redirect: None }, "abc"), JoinNext::Visit("/rooms/abc".to_owned()));
}

#[test]
fn blocked_confirmation_uses_server_message_when_present() {
    assert_eq!(
        join_next(JoinOutcome::ConfirmBlocked { message: Some("Careful".to_owned()) }, "abc"),
        JoinNext::Prompt(JoinPrompt::ConfirmBlocked("Careful".to_owned()))
    );
    let JoinNext::Prompt(JoinPrompt::ConfirmBlocked(fallback)) =
        join_next(JoinOutcome::ConfirmBlocked { message: None }, "abc")
    else {
        panic!("expected block confirmation");
    };
    assert!(!fallback.is_empty());
}

// =============================================================================
// PROMPTS
// =============================================================================

#[test]
fn failures_map_to_prompts() {
    assert_eq!(join_next(JoinOutcome::HostRestricted, "abc"), JoinNext::Prompt(JoinPrompt::HostRestricted));
    assert_eq!(join_next(JoinOutcome::ConfirmLeaveCurrent, "abc"), JoinNext::Prompt(JoinPrompt::ConfirmLeave));
    assert_eq!(join_next(JoinOutcome::LoginRequired, "abc"), JoinNext::Prompt(JoinPrompt::LoginRequired));
    assert_eq!(
        join_next(JoinOutcome::Failed("nope".to_owned()), "abc"),
        JoinNext::Prompt(JoinPrompt::Error("nope".to_owned()))
    );
}
