//! Application state types for the pushbell TUI.
//!
//! The screen has one normal view and two kinds of modal: an alert that
//! must be dismissed, and the permission prompt that the notification
//! service is waiting on. Requests for modals arrive from background tasks
//! as [`UiRequest`]s.

use std::collections::VecDeque;
use tokio::sync::oneshot;

/// The current operational mode of the TUI application.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum AppMode {
    /// Default mode: token, current notification, actions.
    ///
    /// Key bindings in this mode:
    /// - `l`: Schedule a local notification
    /// - `r`: Send a remote notification
    /// - `b`: Toggle foreground/background
    /// - `t`: Tap the last delivered notification
    /// - `q`: Quit application
    #[default]
    Normal,

    /// Alert dialog with a message.
    ///
    /// Key bindings:
    /// - `Enter/Esc/o`: Dismiss
    Alert(String),

    /// Notification permission prompt.
    ///
    /// Key bindings:
    /// - `y/Y/Enter`: Allow
    /// - `n/N/Esc`: Don't allow
    PermissionPrompt,
}

impl AppMode {
    /// Returns true if this mode is a modal overlay.
    pub fn is_modal(&self) -> bool {
        !matches!(self, AppMode::Normal)
    }

    /// Returns a human-readable name for the mode.
    pub fn display_name(&self) -> &'static str {
        match self {
            AppMode::Normal => "Normal",
            AppMode::Alert(_) => "Alert",
            AppMode::PermissionPrompt => "Permission",
        }
    }
}

/// Request from a background task for user interaction.
#[derive(Debug)]
pub enum UiRequest {
    /// Show an alert.
    Alert(String),
    /// Ask for notification permission; answer through the sender.
    Permission(oneshot::Sender<bool>),
}

/// Mutable UI state owned by the runner.
#[derive(Debug, Default)]
pub struct App {
    mode: AppMode,
    alerts: VecDeque<String>,
    pending_prompt: Option<oneshot::Sender<bool>>,
    status: Option<String>,
    foreground: bool,
}

impl App {
    /// Creates a foregrounded app in normal mode.
    pub fn new() -> Self {
        Self {
            foreground: true,
            ..Self::default()
        }
    }

    /// Current mode.
    pub fn mode(&self) -> &AppMode {
        &self.mode
    }

    /// Status line text, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Replaces the status line.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Whether the app is foregrounded.
    pub fn is_foreground(&self) -> bool {
        self.foreground
    }

    /// Flips foreground/background and returns the new value.
    pub fn toggle_foreground(&mut self) -> bool {
        self.foreground = !self.foreground;
        self.foreground
    }

    /// Sets foreground state.
    pub fn set_foreground(&mut self, foreground: bool) {
        self.foreground = foreground;
    }

    /// Queues a request from a background task.
    pub fn push_request(&mut self, request: UiRequest) {
        match request {
            UiRequest::Alert(message) => self.alerts.push_back(message),
            UiRequest::Permission(reply) => {
                // A newer prompt replaces an unanswered one; the old asker sees a refusal.
                if let Some(previous) = self.pending_prompt.replace(reply) {
                    let _ = previous.send(false);
                }
            }
        }
        self.advance();
    }

    /// Answers the open permission prompt.
    pub fn answer_prompt(&mut self, granted: bool) {
        if let Some(reply) = self.pending_prompt.take() {
            if reply.send(granted).is_err() {
                log::debug!("[App] Permission prompt answered after asker went away");
            }
        }
        if self.mode == AppMode::PermissionPrompt {
            self.mode = AppMode::Normal;
        }
        self.advance();
    }

    /// Dismisses the alert on screen.
    pub fn dismiss_alert(&mut self) {
        if matches!(self.mode, AppMode::Alert(_)) {
            self.mode = AppMode::Normal;
        }
        self.advance();
    }

    /// Opens the next modal if none is showing. The prompt goes first.
    fn advance(&mut self) {
        if self.mode.is_modal() {
            return;
        }
        if self.pending_prompt.is_some() {
            self.mode = AppMode::PermissionPrompt;
        } else if let Some(message) = self.alerts.pop_front() {
            self.mode = AppMode::Alert(message);
        }
    }
}
