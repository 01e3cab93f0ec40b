use crate::view_model::AppViewModel;
use crate::{IconState, StatusStrings};

/// Sequence number of a refresh pass; later passes have larger ids.
pub type PassId = u64;

/// Result of one refresh pass, handed from the background runtime to the display thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub pass: PassId,
    pub text: String,
    pub icon: IconState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    tooltip: String,
    icon: Option<IconState>,
    last_pass: Option<PassId>,
    stale_reports: u64,
    shut_down: bool,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_tooltip(StatusStrings::default().idle_description)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose tooltip starts at `initial` (normally the localized idle description).
    pub fn with_tooltip(initial: impl Into<String>) -> Self {
        Self {
            tooltip: initial.into(),
            icon: None,
            last_pass: None,
            stale_reports: 0,
            shut_down: false,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            tooltip: self.tooltip.clone(),
            icon: self.icon,
            last_pass: self.last_pass,
            stale_reports: self.stale_reports,
            shut_down: self.shut_down,
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_newer_pass(&self, pass: PassId) -> bool {
        self.last_pass.is_none_or(|last| pass > last)
    }

    pub(crate) fn accept_pass(&mut self, pass: PassId) {
        self.last_pass = Some(pass);
    }

    pub(crate) fn note_stale_report(&mut self) {
        self.stale_reports += 1;
    }

    /// Returns true if the text differs from what is shown.
    pub(crate) fn set_tooltip(&mut self, text: &str) -> bool {
        if self.tooltip == text {
            return false;
        }
        self.tooltip = text.to_string();
        self.dirty = true;
        true
    }

    /// Returns true if the glyph must be redrawn.
    pub(crate) fn set_icon(&mut self, icon: IconState) -> bool {
        if self.icon == Some(icon) {
            return false;
        }
        self.icon = Some(icon);
        self.dirty = true;
        true
    }

    pub(crate) fn shut_down(&mut self) {
        self.shut_down = true;
        self.dirty = true;
    }
}
