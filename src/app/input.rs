//! Input handling for the TUI application.
//!
//! Maps key presses to [`InputAction`]s based on the current mode, keeping
//! key bindings out of the runner.

use crossterm::event::{KeyCode, KeyModifiers};

use super::AppMode;

/// Result of handling a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// No action needed.
    None,
    /// Request application quit.
    Quit,
    /// Schedule the local notification.
    ScheduleLocal,
    /// Send the remote notification.
    SendRemote,
    /// Move the app between foreground and background.
    ToggleForeground,
    /// Tap the last delivered notification.
    TapNotification,
    /// Close the alert on screen.
    DismissAlert,
    /// Answer the permission prompt.
    AnswerPrompt(bool),
}

/// Handles a key press in any mode.
pub fn handle_key(mode: &AppMode, code: KeyCode, modifiers: KeyModifiers) -> InputAction {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return InputAction::Quit;
    }
    match mode {
        AppMode::Normal => handle_normal_mode_key(code),
        AppMode::Alert(_) => handle_alert_key(code),
        AppMode::PermissionPrompt => handle_prompt_key(code),
    }
}

fn handle_normal_mode_key(code: KeyCode) -> InputAction {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => InputAction::Quit,
        KeyCode::Char('l' | 'L') => InputAction::ScheduleLocal,
        KeyCode::Char('r' | 'R') => InputAction::SendRemote,
        KeyCode::Char('b' | 'B') => InputAction::ToggleForeground,
        KeyCode::Char('t' | 'T') => InputAction::TapNotification,
        _ => InputAction::None,
    }
}

fn handle_alert_key(code: KeyCode) -> InputAction {
    match code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('o' | 'O' | ' ') => {
            InputAction::DismissAlert
        }
        _ => InputAction::None,
    }
}

fn handle_prompt_key(code: KeyCode) -> InputAction {
    match code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => InputAction::AnswerPrompt(true),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => InputAction::AnswerPrompt(false),
        _ => InputAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(mode: &AppMode, code: KeyCode) -> InputAction {
        handle_key(mode, code, KeyModifiers::NONE)
    }

    #[test]
    fn test_normal_mode_bindings() {
        let mode = AppMode::Normal;
        assert_eq!(key(&mode, KeyCode::Char('l')), InputAction::ScheduleLocal);
        assert_eq!(key(&mode, KeyCode::Char('r')), InputAction::SendRemote);
        assert_eq!(key(&mode, KeyCode::Char('b')), InputAction::ToggleForeground);
        assert_eq!(key(&mode, KeyCode::Char('t')), InputAction::TapNotification);
        assert_eq!(key(&mode, KeyCode::Char('q')), InputAction::Quit);
        assert_eq!(key(&mode, KeyCode::Char('x')), InputAction::None);
    }

    #[test]
    fn test_modal_swallows_actions() {
        let alert = AppMode::Alert("hello".into());
        assert_eq!(key(&alert, KeyCode::Char('l')), InputAction::None);
        assert_eq!(key(&alert, KeyCode::Enter), InputAction::DismissAlert);

        let prompt = AppMode::PermissionPrompt;
        assert_eq!(key(&prompt, KeyCode::Char('r')), InputAction::None);
        assert_eq!(key(&prompt, KeyCode::Char('y')), InputAction::AnswerPrompt(true));
        assert_eq!(key(&prompt, KeyCode::Esc), InputAction::AnswerPrompt(false));
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        for mode in [AppMode::Normal, AppMode::PermissionPrompt] {
            assert_eq!(
                handle_key(&mode, KeyCode::Char('c'), KeyModifiers::CONTROL),
                InputAction::Quit
            );
        }
    }
}
