//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render header chrome and room dialogs while reading shared
//! state from Leptos context providers.

pub mod current_room_banner;
pub mod room_create_dialog;
pub mod user_menu;
