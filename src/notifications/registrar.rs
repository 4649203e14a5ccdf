//! Token registration: permission check, prompt, token issuance.
//!
//! The flow is a small state machine:
//!
//! ```text
//! Unknown ──(status = granted)──────────────────────────► Granted
//!    │
//!    └──(status ≠ granted)──► Requested ──(answer = granted)──► Granted
//!                                  │
//!                                  └──(answer ≠ granted)──► Denied
//!
//! (not a physical device) ──────────────────────────────► NoDevice
//! ```
//!
//! `Denied` and `NoDevice` each raise exactly one alert. On Android the default
//! channel is configured afterwards, except after a denial.

// Rust guideline compliant 2026-02

use std::sync::{Arc, Mutex};

use super::payload::PushToken;
use super::service::{Alerter, ChannelConfig, DeviceInfo, NotificationService, PermissionStatus};
use crate::constants::{ALERT_NO_PHYSICAL_DEVICE, ALERT_PERMISSION_DENIED, DEFAULT_CHANNEL_ID};
use crate::error::NotifyError;

/// Where the registrar is in the permission flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegistrationState {
    /// Permission status not yet known to be granted.
    #[default]
    Unknown,
    /// The user is being prompted.
    Requested,
    /// Permission granted; a token can be issued.
    Granted,
    /// The user refused.
    Denied,
    /// Not running on a physical device.
    NoDevice,
}

impl RegistrationState {
    /// State after querying the current permission status.
    pub fn after_query(status: PermissionStatus) -> Self {
        if status.is_granted() {
            Self::Granted
        } else {
            Self::Unknown
        }
    }

    /// State after the user answered the prompt.
    pub fn after_request(status: PermissionStatus) -> Self {
        if status.is_granted() {
            Self::Granted
        } else {
            Self::Denied
        }
    }

    /// Whether the flow has finished.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Granted | Self::Denied | Self::NoDevice)
    }
}

/// Obtains the push token for this installation.
pub struct TokenRegistrar {
    service: Arc<dyn NotificationService>,
    alerter: Arc<dyn Alerter>,
    device: DeviceInfo,
    project_id: String,
    state: Mutex<RegistrationState>,
}

impl std::fmt::Debug for TokenRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRegistrar")
            .field("device", &self.device)
            .field("project_id", &self.project_id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl TokenRegistrar {
    /// Creates a registrar for the given device and project.
    pub fn new(
        service: Arc<dyn NotificationService>,
        alerter: Arc<dyn Alerter>,
        device: DeviceInfo,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            service,
            alerter,
            device,
            project_id: project_id.into(),
            state: Mutex::new(RegistrationState::Unknown),
        }
    }

    /// Current state of the permission flow.
    pub fn state(&self) -> RegistrationState {
        self.state
            .lock()
            .map_or(RegistrationState::Unknown, |state| *state)
    }

    fn transition(&self, next: RegistrationState) {
        if let Ok(mut state) = self.state.lock() {
            log::debug!("[Registrar] {:?} -> {:?}", *state, next);
            *state = next;
            if next.is_terminal() {
                log::info!("[Registrar] Registration finished: {next:?}");
            }
        }
    }

    /// Runs the permission flow and returns the push token.
    ///
    /// Permission and device failures are alerted here before being
    /// returned, so callers only need to record the outcome.
    pub async fn acquire_token(&self) -> Result<PushToken, NotifyError> {
        self.transition(RegistrationState::Unknown);

        if !self.device.is_device {
            self.transition(RegistrationState::NoDevice);
            self.alerter.alert(ALERT_NO_PHYSICAL_DEVICE);
            self.ensure_channel().await;
            return Err(NotifyError::NoPhysicalDevice);
        }

        let existing = self.service.get_permissions().await?;
        self.transition(RegistrationState::after_query(existing));

        if self.state() != RegistrationState::Granted {
            self.transition(RegistrationState::Requested);
            let answered = self.service.request_permissions().await?;
            self.transition(RegistrationState::after_request(answered));
        }

        if self.state() == RegistrationState::Denied {
            self.alerter.alert(ALERT_PERMISSION_DENIED);
            return Err(NotifyError::PermissionDenied);
        }

        let token = self.service.get_token(&self.project_id).await?;
        log::info!("[Registrar] Push token: {token}");

        self.ensure_channel().await;
        Ok(token)
    }

    /// Configures the default channel on platforms that need one.
    async fn ensure_channel(&self) {
        if !self.device.platform.uses_channels() {
            return;
        }
        let config = ChannelConfig::default_channel();
        if let Err(e) = self.service.set_channel(DEFAULT_CHANNEL_ID, &config).await {
            log::warn!("[Registrar] Failed to configure notification channel: {e}");
        }
    }
}
