//! In-process notification service for terminal hosts.
//!
//! Stands in for the OS notification subsystem when pushbell runs on a
//! desktop: permission lives in memory and is asked through a
//! [`PermissionPrompt`], tokens are derived from a per-session installation
//! id, channels are kept in a map, and scheduled notifications are delivered
//! by a Tokio timer into the [`NotificationCenter`].
//!
//! Delivery follows the mobile rules: while foregrounded, received listeners
//! fire and the presentation options decide how it is shown; while
//! backgrounded, the notification goes to the "system tray" (the log) and
//! listeners are not called. Either way it becomes the last delivered
//! notification, which [`LocalNotificationService::tap_last_delivered`] can
//! answer.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::listeners::NotificationCenter;
use super::payload::{NotificationEvent, NotificationPayload, NotificationResponse, PushToken};
use super::service::{
    ChannelConfig, NotificationService, PermissionPrompt, PermissionStatus, PresentationOptions,
    Trigger,
};
use crate::constants::PUSH_TOKEN_PREFIX;
use crate::error::NotifyError;

/// State shared with spawned delivery tasks.
#[derive(Debug)]
struct Shared {
    center: Arc<NotificationCenter>,
    foreground: AtomicBool,
    presentation: PresentationOptions,
    last_delivered: Mutex<Option<NotificationEvent>>,
}

impl Shared {
    fn deliver(&self, event: NotificationEvent) {
        if let Ok(mut last) = self.last_delivered.lock() {
            *last = Some(event.clone());
        }

        if self.foreground.load(Ordering::SeqCst) {
            log::info!(
                "[LocalService] Delivered {} in foreground (alert={}, sound={}, badge={})",
                event.identifier,
                self.presentation.should_show_alert,
                self.presentation.should_play_sound,
                self.presentation.should_set_badge
            );
            self.center.emit_received(&event);
        } else {
            log::info!(
                "[LocalService] Delivered {} to system tray: {:?}",
                event.identifier,
                event.payload.title
            );
        }
    }
}

/// Notification service running inside the process.
pub struct LocalNotificationService {
    shared: Arc<Shared>,
    permission: Mutex<PermissionStatus>,
    prompt: Arc<dyn PermissionPrompt>,
    channels: Mutex<HashMap<String, ChannelConfig>>,
    installation_id: Uuid,
}

impl std::fmt::Debug for LocalNotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalNotificationService")
            .field("installation_id", &self.installation_id)
            .field("foreground", &self.is_foreground())
            .finish_non_exhaustive()
    }
}

impl LocalNotificationService {
    /// Creates a service emitting into `center`, starting foregrounded with
    /// an undetermined permission.
    pub fn new(center: Arc<NotificationCenter>, prompt: Arc<dyn PermissionPrompt>) -> Self {
        Self {
            shared: Arc::new(Shared {
                center,
                foreground: AtomicBool::new(true),
                presentation: PresentationOptions::default(),
                last_delivered: Mutex::new(None),
            }),
            permission: Mutex::new(PermissionStatus::Undetermined),
            prompt,
            channels: Mutex::new(HashMap::new()),
            installation_id: Uuid::new_v4(),
        }
    }

    /// Starts with the given permission status instead of undetermined.
    pub fn with_permission(self, status: PermissionStatus) -> Self {
        if let Ok(mut permission) = self.permission.lock() {
            *permission = status;
        }
        self
    }

    /// Center this service emits events into.
    pub fn center(&self) -> &Arc<NotificationCenter> {
        &self.shared.center
    }

    /// Moves the app to the foreground (`true`) or background (`false`).
    pub fn set_foreground(&self, foreground: bool) {
        self.shared.foreground.store(foreground, Ordering::SeqCst);
        log::info!(
            "[LocalService] App {}",
            if foreground { "foregrounded" } else { "backgrounded" }
        );
    }

    /// Whether the app is foregrounded.
    pub fn is_foreground(&self) -> bool {
        self.shared.foreground.load(Ordering::SeqCst)
    }

    /// Last notification delivered, foreground or not.
    pub fn last_delivered(&self) -> Option<NotificationEvent> {
        self.shared
            .last_delivered
            .lock()
            .ok()
            .and_then(|last| last.clone())
    }

    /// Simulates the user tapping the last delivered notification.
    ///
    /// Tapping brings the app to the foreground. Returns `false` when
    /// nothing has been delivered yet.
    pub fn tap_last_delivered(&self) -> bool {
        let Some(event) = self.last_delivered() else {
            return false;
        };
        self.set_foreground(true);
        self.shared
            .center
            .emit_response(&NotificationResponse::default_action(event));
        true
    }

    /// Configured channel, if any.
    pub fn channel(&self, id: &str) -> Option<ChannelConfig> {
        self.channels
            .lock()
            .ok()
            .and_then(|channels| channels.get(id).cloned())
    }

    fn current_permission(&self) -> PermissionStatus {
        self.permission
            .lock()
            .map_or(PermissionStatus::Undetermined, |status| *status)
    }
}

#[async_trait]
impl NotificationService for LocalNotificationService {
    async fn get_permissions(&self) -> Result<PermissionStatus, NotifyError> {
        Ok(self.current_permission())
    }

    async fn request_permissions(&self) -> Result<PermissionStatus, NotifyError> {
        // Like the OS, a previous answer is not asked again.
        let current = self.current_permission();
        if current != PermissionStatus::Undetermined {
            return Ok(current);
        }

        let status = if self.prompt.ask().await {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        let mut permission = self
            .permission
            .lock()
            .map_err(|_poisoned| NotifyError::Service("permission state poisoned".into()))?;
        *permission = status;
        Ok(status)
    }

    async fn get_token(&self, project_id: &str) -> Result<PushToken, NotifyError> {
        if project_id.is_empty() {
            return Err(NotifyError::Service("projectId is required".into()));
        }
        if !self.current_permission().is_granted() {
            return Err(NotifyError::PermissionDenied);
        }
        Ok(PushToken::new(format!(
            "{PUSH_TOKEN_PREFIX}[{}]",
            self.installation_id.simple()
        )))
    }

    async fn set_channel(&self, id: &str, config: &ChannelConfig) -> Result<(), NotifyError> {
        let mut channels = self
            .channels
            .lock()
            .map_err(|_poisoned| NotifyError::Service("channel registry poisoned".into()))?;
        channels.insert(id.to_string(), config.clone());
        log::debug!("[LocalService] Channel {id:?} configured: {config:?}");
        Ok(())
    }

    async fn schedule(
        &self,
        payload: NotificationPayload,
        trigger: Trigger,
    ) -> Result<String, NotifyError> {
        if !self.current_permission().is_granted() {
            return Err(NotifyError::Scheduling("notification permission not granted".into()));
        }

        let identifier = Uuid::new_v4().to_string();
        let shared = Arc::clone(&self.shared);
        let delay = trigger.delay();
        let id = identifier.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.deliver(NotificationEvent::delivered_now(id, payload));
        });

        Ok(identifier)
    }
}
