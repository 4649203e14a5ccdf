//! Error taxonomy for the notification lifecycle.
//!
//! Permission and device errors are surfaced to the user as alerts by the
//! registrar. Network and scheduling errors are returned to whoever triggered
//! the dispatch; nothing is retried.

/// Errors that can occur while registering for or dispatching notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The user did not grant notification permission.
    PermissionDenied,
    /// Registration ran on an emulator or simulator.
    NoPhysicalDevice,
    /// The push-relay request could not be sent.
    Network(String),
    /// The notification service refused to schedule a notification.
    Scheduling(String),
    /// Any other notification service failure (e.g. token issuance).
    Service(String),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "Notification permission denied"),
            Self::NoPhysicalDevice => write!(f, "Push notifications require a physical device"),
            Self::Network(msg) => write!(f, "Network failure: {msg}"),
            Self::Scheduling(msg) => write!(f, "Scheduling failure: {msg}"),
            Self::Service(msg) => write!(f, "Notification service error: {msg}"),
        }
    }
}

impl std::error::Error for NotifyError {}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Service(format!("serialization: {err}"))
    }
}
