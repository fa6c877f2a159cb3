//! Local UI chrome state (header menus).
//!
//! DESIGN
//! ======
//! Keeps transient presentation concerns out of session state so header
//! controls can evolve independently of auth data.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

/// Open/closed state of the header menus. At most one is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub mobile_menu_open: bool,
    pub user_menu_open: bool,
}

impl UiState {
    pub fn toggle_mobile_menu(&mut self) {
        self.mobile_menu_open = !self.mobile_menu_open;
        self.user_menu_open = false;
    }

    pub fn toggle_user_menu(&mut self) {
        self.user_menu_open = !self.user_menu_open;
        self.mobile_menu_open = false;
    }

    /// Route changes and outside clicks close everything.
    pub fn close_menus(&mut self) {
        *self = Self::default();
    }
}
