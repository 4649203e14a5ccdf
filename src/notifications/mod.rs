//! Push notification lifecycle.
//!
//! Registration, event listeners, and dispatch for local and remote
//! notifications.
//!
//! # Architecture
//!
//! ```text
//! mount
//!   ├── TokenRegistrar ── permission? ── prompt ── token ──► token slot
//!   └── subscribe ──► ListenerSet
//!                        ├── on_received  ──► current-notification slot
//!                        └── on_responded ──► log
//!
//! UI action
//!   ├── Dispatcher::schedule_local ── NotificationService::schedule (2 s)
//!   │                                     └── NotificationCenter ──► on_received
//!   └── Dispatcher::send_remote ── sleep 3 s ── PushRelay (HTTP POST)
//! ```
//!
//! The OS notification service, alert surface, and permission prompt are
//! traits in [`service`]; [`local`] implements the service for terminal hosts
//! and [`relay`] talks to the Expo push endpoint.

// Rust guideline compliant 2026-02

pub mod dispatcher;
pub mod listeners;
pub mod local;
pub mod payload;
pub mod registrar;
pub mod relay;
pub mod service;
pub mod slot;

pub use dispatcher::Dispatcher;
pub use listeners::{subscribe, ListenerHandle, ListenerKind, ListenerSet, NotificationCenter};
pub use local::LocalNotificationService;
pub use payload::{
    NotificationEvent, NotificationPayload, NotificationResponse, PushMessage, PushToken,
};
pub use registrar::{RegistrationState, TokenRegistrar};
pub use relay::{ExpoPushClient, PushRelay};
pub use service::{
    Alerter, AndroidImportance, ChannelConfig, DeviceInfo, FixedAnswer, LogAlerter,
    NotificationService, PermissionPrompt, PermissionStatus, Platform, PresentationOptions,
    Trigger,
};
pub use slot::StateSlot;
