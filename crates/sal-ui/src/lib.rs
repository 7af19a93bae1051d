//! User interface components for the salary dashboard
//!
//! Theme, menu bar and the filter panel. Every gesture becomes a
//! `sal_core::Command` queued on the frame's `ViewerContext`.

pub mod panels;
pub mod shell;
pub mod theme;

use std::time::Instant;

pub use panels::{range_label, FilterPanel};
pub use shell::{menu_bar, show_empty_state, show_error_messages, MenuAction};
pub use theme::{apply_theme, Theme};

/// UI state that persists across frames
#[derive(Default)]
pub struct UiState {
    pub theme: Theme,

    /// A load is in flight
    pub loading: bool,

    /// Name of the loaded salary file
    pub source_name: Option<String>,

    /// Error messages to display
    pub error_messages: Vec<ErrorMessage>,
}

impl UiState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    pub fn push_error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.error_messages.push(ErrorMessage {
            title: title.into(),
            message: message.into(),
            timestamp: Instant::now(),
        });
    }

    pub fn toggle_theme(&mut self) -> &Theme {
        self.theme = if self.theme.dark_mode { Theme::light() } else { Theme::dark() };
        &self.theme
    }
}

/// Error message to display
pub struct ErrorMessage {
    pub title: String,
    pub message: String,
    pub timestamp: Instant,
}
