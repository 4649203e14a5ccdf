//! Application state and event handling for the pushbell TUI.
//!
//! - [`AppMode`] - normal view or one of the modal dialogs
//! - [`App`] - modal queue, status line, foreground flag
//! - [`input`] - key bindings per mode
//! - [`ui`] - rendering
//!
//! # Application Flow
//!
//! ```text
//! Normal ──(UiRequest::Permission)──► PermissionPrompt ──(y/n)──► Normal
//!    │                                                             ▲
//!    └──(UiRequest::Alert)──► Alert ──(Enter)──────────────────────┘
//! ```

pub mod input;
pub mod state;
pub mod ui;

pub use input::{handle_key, InputAction};
pub use state::{App, AppMode, UiRequest};
pub use ui::{centered_rect, render};
