//! Client-side form validation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Login, signup, onboarding, profile, contact and room-create forms check
//! input before any request is sent. The server re-validates everything; these
//! checks exist to give immediate feedback.
//!
//! Lengths are counted in characters, not bytes.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use crate::net::types::{CreateRoomRequest, IdValue};

pub const PSN_ID_MIN: usize = 3;
pub const PSN_ID_MAX: usize = 16;
pub const PASSWORD_MIN: usize = 6;

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Required field with `local@domain.tld` shape.
///
/// # Errors
///
/// Returns the user-facing message for the first failed rule.
pub fn validate_email(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        return Err("Please enter your email address");
    }
    if !has_email_shape(value) {
        return Err("Please enter a valid email address");
    }
    Ok(())
}

fn has_email_shape(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let clean = |s: &str| !s.is_empty() && !s.contains('@') && !s.chars().any(char::is_whitespace);
    if !clean(local) || !clean(domain) {
        return false;
    }
    let last = domain.len() - 1;
    domain.char_indices().any(|(i, c)| c == '.' && i > 0 && i < last)
}

/// PlayStation Network online id: 3 to 16 of `[A-Za-z0-9_-]`.
///
/// # Errors
///
/// Returns the user-facing message for the first failed rule.
pub fn validate_psn_id(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        return Err("Please enter your PSN ID");
    }
    let len = char_len(value);
    if len < PSN_ID_MIN {
        return Err("PSN ID must be at least 3 characters");
    }
    if len > PSN_ID_MAX {
        return Err("PSN ID must be 16 characters or fewer");
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err("PSN ID may only contain letters, digits, hyphens and underscores");
    }
    Ok(())
}

/// # Errors
///
/// Returns the user-facing message for the first failed rule.
pub fn validate_password(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        return Err("Please enter your password");
    }
    if char_len(value) < PASSWORD_MIN {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

/// Non-blank check with the field label in the message.
///
/// # Errors
///
/// Returns `"Please enter {field_name}"` when `value` is blank.
pub fn validate_required(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("Please enter {field_name}"));
    }
    Ok(())
}

/// Stricter address check used by the contact form.
pub fn is_valid_contact_email(email: &str) -> bool {
    if email.len() > 254 || email.matches('@').count() != 1 {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 || domain.is_empty() || domain.len() > 253 {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return false;
    }
    let local_ok = local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'));
    let domain_ok = domain.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'));
    if !local_ok || !domain_ok {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()),
        None => false,
    }
}

// =============================================================================
// PROFILE FORM
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub display_name: String,
    pub bio: String,
    pub psn_online_id: String,
    pub nintendo_network_id: String,
    pub nintendo_switch_id: String,
    pub twitter_id: String,
}

/// # Errors
///
/// Returns every failed rule's message, in field order.
pub fn validate_profile_form(form: &ProfileForm) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    if form.display_name.trim().is_empty() {
        errors.push("Display name is required".to_owned());
    } else if char_len(&form.display_name) > 100 {
        errors.push("Display name must be 100 characters or fewer".to_owned());
    }
    let limits = [
        (&form.bio, 500, "Bio"),
        (&form.psn_online_id, 16, "PSN ID"),
        (&form.nintendo_network_id, 16, "Nintendo Network ID"),
        (&form.nintendo_switch_id, 20, "Nintendo Switch ID"),
        (&form.twitter_id, 15, "Twitter ID"),
    ];
    for (value, max, label) in limits {
        if char_len(value) > max {
            errors.push(format!("{label} must be {max} characters or fewer"));
        }
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

// =============================================================================
// CONTACT FORM
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub inquiry_type: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub privacy_agreed: bool,
}

/// A failed rule attached to a form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

fn contact_field_error(form: &ContactForm, field: &'static str) -> Option<&'static str> {
    match field {
        "inquiry_type" => form.inquiry_type.is_empty().then_some("Please choose an inquiry type"),
        "name" => {
            let name = form.name.trim();
            if name.is_empty() {
                Some("Please enter your name")
            } else if char_len(name) > 100 {
                Some("Name must be 100 characters or fewer")
            } else {
                None
            }
        }
        "email" => {
            let email = form.email.trim();
            if email.is_empty() {
                Some("Please enter your email address")
            } else if !is_valid_contact_email(email) {
                Some("Please enter the email address in a valid format")
            } else {
                None
            }
        }
        "subject" => {
            let subject = form.subject.trim();
            if subject.is_empty() {
                Some("Please enter a subject")
            } else if char_len(subject) > 200 {
                Some("Subject must be 200 characters or fewer")
            } else {
                None
            }
        }
        "message" => {
            let message = form.message.trim();
            if message.is_empty() {
                Some("Please enter your message")
            } else if char_len(message) < 10 {
                Some("Message must be at least 10 characters")
            } else if char_len(&form.message) > 2000 {
                Some("Message must be 2000 characters or fewer")
            } else {
                None
            }
        }
        "privacy_agreed" => (!form.privacy_agreed).then_some("Please agree to the privacy policy"),
        _ => None,
    }
}

/// # Errors
///
/// Returns one [`FieldError`] per invalid field.
pub fn validate_contact_form(form: &ContactForm) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = ["inquiry_type", "name", "email", "subject", "message", "privacy_agreed"]
        .into_iter()
        .filter_map(|field| contact_field_error(form, field).map(|message| FieldError { field, message }))
        .collect();
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

// =============================================================================
// ROOM CREATE FORM
// =============================================================================

/// Raw room-create form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateRoomForm {
    pub name: String,
    pub game_version_id: String,
    pub max_players: String,
    pub password: String,
    pub target_monster: String,
    pub rank_requirement: String,
    pub description: String,
}

fn blank_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

impl CreateRoomForm {
    /// Whether the submit button should be enabled.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty() && !self.game_version_id.trim().is_empty() && !self.max_players.trim().is_empty()
    }

    /// Build the request body.
    ///
    /// # Errors
    ///
    /// Returns a user-facing message when a required field is missing or the
    /// player count is not a positive number.
    pub fn to_request(&self) -> Result<CreateRoomRequest, String> {
        validate_required(&self.name, "a room name")?;
        validate_required(&self.game_version_id, "a game")?;
        validate_required(&self.max_players, "the maximum number of players")?;
        let max_players = self
            .max_players
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| "Maximum players must be a positive number".to_owned())?;
        Ok(CreateRoomRequest {
            name: self.name.trim().to_owned(),
            game_version_id: IdValue::coerce(&self.game_version_id),
            max_players,
            password: blank_to_none(&self.password),
            target_monster: blank_to_none(&self.target_monster),
            rank_requirement: blank_to_none(&self.rank_requirement),
            description: blank_to_none(&self.description),
        })
    }
}
