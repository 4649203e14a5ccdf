//! Notification lifecycle controller.
//!
//! Owns the registrar, the dispatcher, the listener subscriptions, and the
//! two single-slot state cells (current token, current notification). The
//! screen reads [`LifecycleController::snapshot`]; nothing else writes the
//! cells.
//!
//! # Lifecycle
//!
//! ```text
//! new ──► mount ──► (schedule_local | send_remote)* ──► unmount
//! ```
//!
//! `mount` subscribes first so no delivery is missed while the permission
//! prompt is open. `unmount` is idempotent, and dropping the controller
//! releases the subscriptions as well.

// Rust guideline compliant 2026-02

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::NotifyError;
use crate::notifications::{
    subscribe, Alerter, DeviceInfo, Dispatcher, ListenerSet, NotificationCenter,
    NotificationEvent, NotificationService, PushRelay, PushToken, RegistrationState, StateSlot,
    TokenRegistrar,
};

/// Collaborators and settings needed to build a controller.
#[derive(Clone)]
pub struct ControllerParts {
    /// OS notification service.
    pub service: Arc<dyn NotificationService>,
    /// Event source the service emits into.
    pub center: Arc<NotificationCenter>,
    /// Remote push relay.
    pub relay: Arc<dyn PushRelay>,
    /// User-visible alert surface.
    pub alerter: Arc<dyn Alerter>,
    /// Device facts used by the registrar.
    pub device: DeviceInfo,
    /// Project the push token is scoped to.
    pub project_id: String,
    /// Local notification delay.
    pub local_delay: Duration,
    /// Remote push delay.
    pub remote_delay: Duration,
}

impl std::fmt::Debug for ControllerParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerParts")
            .field("device", &self.device)
            .field("project_id", &self.project_id)
            .field("local_delay", &self.local_delay)
            .field("remote_delay", &self.remote_delay)
            .finish_non_exhaustive()
    }
}

impl ControllerParts {
    /// Parts with device, project and delays taken from `config`.
    pub fn from_config(
        config: &Config,
        service: Arc<dyn NotificationService>,
        center: Arc<NotificationCenter>,
        relay: Arc<dyn PushRelay>,
        alerter: Arc<dyn Alerter>,
    ) -> Self {
        Self {
            service,
            center,
            relay,
            alerter,
            device: DeviceInfo {
                is_device: config.physical_device,
                platform: config.platform,
            },
            project_id: config.project_id.clone(),
            local_delay: config.local_delay(),
            remote_delay: config.remote_delay(),
        }
    }
}

/// What the screen shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScreenState {
    /// Push token, empty until obtained.
    pub token: String,
    /// Title of the current notification.
    pub title: Option<String>,
    /// Body of the current notification.
    pub body: Option<String>,
    /// Data of the current notification as JSON text.
    pub data: Option<String>,
}

/// Drives registration, listening and dispatch for one session.
pub struct LifecycleController {
    registrar: TokenRegistrar,
    dispatcher: Dispatcher,
    center: Arc<NotificationCenter>,
    listeners: Mutex<Option<ListenerSet>>,
    token: StateSlot<PushToken>,
    notification: Arc<StateSlot<NotificationEvent>>,
}

impl std::fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleController")
            .field("registration", &self.registrar.state())
            .field("mounted", &self.is_mounted())
            .field("token", &self.token.get())
            .finish_non_exhaustive()
    }
}

impl LifecycleController {
    /// Builds a controller from its parts. Nothing runs until [`Self::mount`].
    pub fn new(parts: ControllerParts) -> Self {
        let registrar = TokenRegistrar::new(
            Arc::clone(&parts.service),
            parts.alerter,
            parts.device,
            parts.project_id,
        );
        let dispatcher = Dispatcher::new(
            parts.service,
            parts.relay,
            parts.local_delay,
            parts.remote_delay,
        );
        Self {
            registrar,
            dispatcher,
            center: parts.center,
            listeners: Mutex::new(None),
            token: StateSlot::new(),
            notification: Arc::new(StateSlot::new()),
        }
    }

    /// Subscribes the listeners, then acquires the push token.
    ///
    /// Returns the token on success. Permission and device failures have
    /// already been alerted by the registrar; other failures are logged.
    pub async fn mount(&self) -> Option<PushToken> {
        self.ensure_subscribed();

        match self.registrar.acquire_token().await {
            Ok(token) => {
                self.token.set(token.clone());
                Some(token)
            }
            Err(e @ (NotifyError::PermissionDenied | NotifyError::NoPhysicalDevice)) => {
                log::warn!("[Controller] No push token: {e}");
                None
            }
            Err(e) => {
                log::error!("[Controller] Token registration failed: {e}");
                None
            }
        }
    }

    fn ensure_subscribed(&self) {
        let Ok(mut listeners) = self.listeners.lock() else {
            log::error!("[Controller] Listener state poisoned, not subscribing");
            return;
        };
        if listeners.as_ref().is_some_and(ListenerSet::is_active) {
            return;
        }
        *listeners = Some(subscribe(&self.center, Arc::clone(&self.notification)));
    }

    /// Releases both listeners. Safe to call repeatedly or before mount.
    pub fn unmount(&self) {
        if let Ok(mut listeners) = self.listeners.lock() {
            if let Some(set) = listeners.as_mut() {
                set.unsubscribe();
            }
            *listeners = None;
        }
    }

    /// Whether listeners are currently subscribed.
    pub fn is_mounted(&self) -> bool {
        self.listeners
            .lock()
            .map(|listeners| listeners.as_ref().is_some_and(ListenerSet::is_active))
            .unwrap_or(false)
    }

    /// Schedules the local notification.
    pub async fn schedule_local(&self) -> Result<String, NotifyError> {
        self.dispatcher.schedule_local().await
    }

    /// Sends the remote notification to the current token (empty if none).
    pub fn send_remote(&self) -> JoinHandle<Result<(), NotifyError>> {
        let token = self.token.get().unwrap_or_default();
        self.dispatcher.send_remote(token.as_str())
    }

    /// Current push token.
    pub fn token(&self) -> Option<PushToken> {
        self.token.get()
    }

    /// Most recently received notification.
    pub fn current_notification(&self) -> Option<NotificationEvent> {
        self.notification.get()
    }

    /// Where token registration stands.
    pub fn registration_state(&self) -> RegistrationState {
        self.registrar.state()
    }

    /// Receiver woken whenever a new notification is received.
    pub fn watch_notifications(&self) -> tokio::sync::watch::Receiver<Option<NotificationEvent>> {
        self.notification.subscribe()
    }

    /// Values the screen renders.
    pub fn snapshot(&self) -> ScreenState {
        let token = self.token.get().map(|t| t.to_string()).unwrap_or_default();
        match self.notification.get() {
            Some(event) => ScreenState {
                token,
                data: Some(event.payload.data_json()),
                title: Some(event.payload.title),
                body: Some(event.payload.body),
            },
            None => ScreenState {
                token,
                ..ScreenState::default()
            },
        }
    }
}
