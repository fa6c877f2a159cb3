//! Room create/join dialog flow.
//!
//! DESIGN
//! ======
//! Opening the create dialog first asks the server for the caller's room
//! status: a host sees a warning (one hosted room at a time), a guest is asked
//! to confirm leaving their room, everyone else gets the form. A status lookup
//! failure falls through to the form; the server enforces the rule anyway.
//!
//! Join failures are classified from HTTP status and error code into the
//! dialog the rooms page should show next.

#[cfg(test)]
#[path = "room_create_test.rs"]
mod room_create_test;

use super::session_store::StoreError;
use crate::net::types::{Room, RoomActionResponse, RoomRole, RoomStatus};
use crate::util::validation::CreateRoomForm;

/// Which create-flow dialog is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CreateDialog {
    #[default]
    Closed,
    Form,
    /// The user already hosts a room.
    HostWarning,
    /// The user is a guest elsewhere and must confirm leaving.
    GuestConfirm,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomCreateFlow {
    pub dialog: CreateDialog,
    /// Room behind a host warning or guest confirmation.
    pub current_room: Option<Room>,
    pub form: CreateRoomForm,
    pub form_error: Option<String>,
    pub submitting: bool,
}

impl RoomCreateFlow {
    /// Pick the dialog for a room-status lookup result.
    pub fn open_with_status(&mut self, status: Result<RoomStatus, StoreError>) {
        match status {
            Ok(RoomStatus { status: RoomRole::Host, room }) => {
                self.current_room = room;
                self.dialog = CreateDialog::HostWarning;
            }
            Ok(RoomStatus { status: RoomRole::Guest, room }) => {
                self.current_room = room;
                self.dialog = CreateDialog::GuestConfirm;
            }
            Ok(_) => self.open_form(),
            Err(e) => {
                log::warn!("room status check failed: {e}");
                self.open_form();
            }
        }
    }

    fn open_form(&mut self) {
        self.reset_form();
        self.dialog = CreateDialog::Form;
    }

    pub fn reset_form(&mut self) {
        self.form = CreateRoomForm::default();
        self.form_error = None;
        self.submitting = false;
        self.current_room = None;
    }

    /// Guest confirmed leaving their room; show the form.
    pub fn confirm_and_open(&mut self) {
        self.open_form();
    }

    pub fn close(&mut self) {
        self.reset_form();
        self.dialog = CreateDialog::Closed;
    }

    /// Escape closes whichever dialog is open.
    pub fn handle_escape(&mut self) {
        if self.dialog != CreateDialog::Closed {
            self.close();
        }
    }

    /// Apply a failed submit. A host conflict switches to the host warning.
    pub fn apply_create_error(&mut self, err: &StoreError) {
        self.submitting = false;
        if let StoreError::Api(api) = err {
            if api.status() == Some(409) && api.code() == Some("HOST_ROOM_ACTIVE") {
                self.form = CreateRoomForm::default();
                self.form_error = None;
                self.dialog = CreateDialog::HostWarning;
                return;
            }
        }
        self.form_error = Some(err.to_string());
    }
}

// =============================================================================
// JOIN
// =============================================================================

/// What the rooms page should do after a join attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Joined; follow the redirect or reload.
    Joined { redirect: Option<String> },
    /// The server warns about a block relationship; confirm to proceed.
    ConfirmBlocked { message: Option<String> },
    /// The user hosts a room and cannot join another.
    HostRestricted,
    /// The user is in another room; confirm to leave it and join.
    ConfirmLeaveCurrent,
    /// Not signed in; show the login prompt.
    LoginRequired,
    Failed(String),
}

/// Classify a join response.
pub fn join_outcome(result: Result<RoomActionResponse, StoreError>) -> JoinOutcome {
    let err = match result {
        Ok(resp) if resp.needs_block_confirmation() => return JoinOutcome::ConfirmBlocked { message: resp.message },
        Ok(resp) => return JoinOutcome::Joined { redirect: resp.redirect },
        Err(err) => err,
    };
    let StoreError::Api(api) = &err else {
        return JoinOutcome::Failed(err.to_string());
    };
    match (api.status(), api.code()) {
        (Some(401), _) => JoinOutcome::LoginRequired,
        (Some(409), Some("HOST_CANNOT_JOIN")) => JoinOutcome::HostRestricted,
        (Some(409), _) => JoinOutcome::ConfirmLeaveCurrent,
        (Some(403), Some("BLOCKED_BY_HOST")) => JoinOutcome::Failed("You cannot join this room".to_owned()),
        (Some(403), Some("BLOCKED_BY_MEMBER")) => {
            JoinOutcome::Failed("You cannot join because of a block relationship".to_owned())
        }
        _ => JoinOutcome::Failed(err.to_string()),
    }
}
