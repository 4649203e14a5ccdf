//! Contracts of the external collaborators.
//!
//! The OS notification service, the user-facing alert surface, and the
//! permission prompt are all reached through the traits in this module. The
//! controller never talks to a platform API directly.

// Rust guideline compliant 2026-02

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::payload::{NotificationPayload, PushToken};
use crate::constants::{DEFAULT_CHANNEL_ID, DEFAULT_LIGHT_COLOR, DEFAULT_VIBRATION_PATTERN};
use crate::error::NotifyError;

/// Notification permission as reported by the OS.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// The user allowed notifications.
    Granted,
    /// The user refused notifications.
    Denied,
    /// The user has not been asked yet.
    Undetermined,
}

impl PermissionStatus {
    /// Whether notifications may be shown.
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// Platform variant the app runs as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Apple mobile platform.
    Ios,
    /// Android; requires a notification channel.
    Android,
    /// Any other host (desktop terminal).
    Other,
}

impl Platform {
    /// Platform of the build target.
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else {
            Self::Other
        }
    }

    /// Whether notification channels must be configured.
    pub fn uses_channels(self) -> bool {
        self == Self::Android
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            "other" | "desktop" => Ok(Self::Other),
            other => Err(format!("Unknown platform '{other}' (expected ios, android or other)")),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ios => write!(f, "ios"),
            Self::Android => write!(f, "android"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// What the registrar needs to know about the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    /// `false` on emulators and simulators.
    pub is_device: bool,
    /// Platform variant.
    pub platform: Platform,
}

/// Importance level of an Android notification channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AndroidImportance {
    /// No sound, no visual interruption, collapsed.
    Min,
    /// No sound.
    Low,
    /// Sound, no heads-up.
    Default,
    /// Sound and heads-up.
    High,
    /// Highest importance.
    Max,
}

/// Configuration of a notification channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// User-visible channel name.
    pub name: String,
    /// Channel importance.
    pub importance: AndroidImportance,
    /// Vibration pattern in milliseconds (off/on alternating).
    pub vibration_pattern: Vec<u64>,
    /// Notification light color (ARGB hex).
    pub light_color: String,
}

impl ChannelConfig {
    /// The default channel: maximum importance, short triple vibration.
    pub fn default_channel() -> Self {
        Self {
            name: DEFAULT_CHANNEL_ID.to_string(),
            importance: AndroidImportance::Max,
            vibration_pattern: DEFAULT_VIBRATION_PATTERN.to_vec(),
            light_color: DEFAULT_LIGHT_COLOR.to_string(),
        }
    }
}

/// When a scheduled notification fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Deliver immediately.
    Immediate,
    /// Deliver once after the given delay.
    TimeInterval(Duration),
}

impl Trigger {
    /// Delay until delivery.
    pub fn delay(self) -> Duration {
        match self {
            Self::Immediate => Duration::ZERO,
            Self::TimeInterval(delay) => delay,
        }
    }
}

/// How a notification is presented while the app is foregrounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationOptions {
    /// Show a banner/alert.
    pub should_show_alert: bool,
    /// Play the notification sound.
    pub should_play_sound: bool,
    /// Update the app badge.
    pub should_set_badge: bool,
}

impl Default for PresentationOptions {
    fn default() -> Self {
        Self {
            should_show_alert: true,
            should_play_sound: false,
            should_set_badge: false,
        }
    }
}

/// The OS-level notification service.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Current permission status, without prompting.
    async fn get_permissions(&self) -> Result<PermissionStatus, NotifyError>;

    /// Prompts the user and returns the resulting status.
    async fn request_permissions(&self) -> Result<PermissionStatus, NotifyError>;

    /// Issues a push token scoped to `project_id`.
    async fn get_token(&self, project_id: &str) -> Result<PushToken, NotifyError>;

    /// Creates or updates a notification channel. Must be idempotent.
    async fn set_channel(&self, id: &str, config: &ChannelConfig) -> Result<(), NotifyError>;

    /// Schedules a local notification and returns its identifier.
    async fn schedule(
        &self,
        payload: NotificationPayload,
        trigger: Trigger,
    ) -> Result<String, NotifyError>;
}

/// User-visible alert surface.
pub trait Alerter: Send + Sync {
    /// Shows `message` to the user.
    fn alert(&self, message: &str);
}

/// Alerter for hosts without a screen: writes the alert to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlerter;

impl Alerter for LogAlerter {
    fn alert(&self, message: &str) {
        log::warn!("[Alert] {message}");
    }
}

/// Interactive permission prompt.
#[async_trait]
pub trait PermissionPrompt: Send + Sync {
    /// Asks the user; resolves once they answer. `true` means granted.
    async fn ask(&self) -> bool;
}

/// Prompt that always gives the same answer (headless mode).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

#[async_trait]
impl PermissionPrompt for FixedAnswer {
    async fn ask(&self) -> bool {
        log::info!("[Prompt] Answering permission prompt: granted={}", self.0);
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_channel() {
        let channel = ChannelConfig::default_channel();
        assert_eq!(channel.name, "default");
        assert_eq!(channel.importance, AndroidImportance::Max);
        assert_eq!(channel.vibration_pattern, vec![0, 250, 250, 250]);
        assert_eq!(channel.light_color, "#FF231F7C");
    }

    #[test]
    fn test_platform_parse() {
        assert_eq!("Android".parse::<Platform>(), Ok(Platform::Android));
        assert_eq!("ios".parse::<Platform>(), Ok(Platform::Ios));
        assert!("symbian".parse::<Platform>().is_err());
        assert!(Platform::Android.uses_channels());
        assert!(!Platform::Ios.uses_channels());
    }

    #[test]
    fn test_presentation_defaults() {
        let options = PresentationOptions::default();
        assert!(options.should_show_alert);
        assert!(!options.should_play_sound);
        assert!(!options.should_set_badge);
    }

    #[test]
    fn test_trigger_delay() {
        assert_eq!(Trigger::Immediate.delay(), Duration::ZERO);
        assert_eq!(
            Trigger::TimeInterval(Duration::from_secs(2)).delay(),
            Duration::from_secs(2)
        );
    }

    #[tokio::test]
    async fn test_fixed_answer_prompt() {
        assert!(FixedAnswer(true).ask().await);
        assert!(!FixedAnswer(false).ask().await);
    }
}
