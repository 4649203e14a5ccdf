//! Pushbell - push notification lifecycle demo.
//!
//! Registers for push notifications, listens for deliveries and user
//! responses, and fires notifications locally (timer) or remotely (Expo push
//! relay), all driven from a single terminal screen.
//!
//! # Architecture
//!
//! - **Controller** - owns the lifecycle and the single-slot screen state
//! - **Notifications** - registrar, listener bridge, dispatcher, service traits
//! - **TUI** - terminal view adapter (optional - headless mode works without it)
//!
//! # Modules
//!
//! - [`controller`] - mount/unmount, dispatch entry points, screen snapshot
//! - [`notifications`] - everything that talks to the notification service or relay
//! - [`app`] - TUI state types, input handling, rendering
//! - [`config`] - configuration loading/saving

pub mod app;
pub mod config;
pub mod constants;
pub mod controller;
pub mod env;
pub mod error;
pub mod notifications;
pub mod tui;

// Re-export commonly used types
pub use config::Config;
pub use controller::{ControllerParts, LifecycleController, ScreenState};
pub use error::NotifyError;
