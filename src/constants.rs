//! Application-wide constants for pushbell.
//!
//! Centralizes the fixed values of the notification flow: relay endpoint,
//! project identifier, dispatch delays, the Android channel definition, and
//! UI timing. Values that users may override live in [`crate::config`] and
//! default to these.

use std::time::Duration;

// ============================================================================
// Push relay
// ============================================================================

/// Expo push-relay endpoint that accepts message envelopes.
pub const PUSH_SEND_URL: &str = "https://exp.host/--/api/v2/push/send";

/// Project identifier used to scope issued push tokens.
///
/// A configuration constant, not a secret.
pub const PROJECT_ID: &str = "f76084b6-e5c2-4f66-bac8-b0cc25c18c42";

/// Prefix of every token issued by the push-relay SDK.
pub const PUSH_TOKEN_PREFIX: &str = "ExponentPushToken";

// ============================================================================
// Dispatch delays
// ============================================================================

/// Delay before a locally scheduled notification is delivered.
pub const LOCAL_NOTIFICATION_DELAY: Duration = Duration::from_secs(2);

/// Delay before the remote push request is sent.
///
/// Gives the operator time to background the app before delivery.
pub const REMOTE_SEND_DELAY: Duration = Duration::from_secs(3);

// ============================================================================
// Android notification channel
// ============================================================================

/// Identifier (and display name) of the default notification channel.
pub const DEFAULT_CHANNEL_ID: &str = "default";

/// Vibration pattern of the default channel, in milliseconds.
pub const DEFAULT_VIBRATION_PATTERN: [u64; 4] = [0, 250, 250, 250];

/// Light color of the default channel (ARGB hex).
pub const DEFAULT_LIGHT_COLOR: &str = "#FF231F7C";

/// Action identifier reported when the user taps the notification body.
pub const DEFAULT_ACTION_IDENTIFIER: &str = "expo.modules.notifications.actions.DEFAULT";

// ============================================================================
// Alerts
// ============================================================================

/// Alert shown when registration runs on an emulator or simulator.
pub const ALERT_NO_PHYSICAL_DEVICE: &str = "Must use physical device for Push Notifications";

/// Alert shown when the user refuses notification permission.
pub const ALERT_PERMISSION_DENIED: &str = "Failed to get push token for push notification!";

// ============================================================================
// UI
// ============================================================================

/// TUI frame delay (approximately 60fps).
pub const TUI_FRAME_DELAY: Duration = Duration::from_millis(16);

/// Log file name inside the config directory.
pub const LOG_FILE_NAME: &str = "pushbell.log";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays() {
        assert_eq!(LOCAL_NOTIFICATION_DELAY.as_millis(), 2000);
        assert_eq!(REMOTE_SEND_DELAY.as_millis(), 3000);
    }

    #[test]
    fn test_relay_url_is_https() {
        assert!(PUSH_SEND_URL.starts_with("https://"));
    }
}
