//! Terminal user interface.
//!
//! - [`guard`] - raw mode / alternate screen RAII guard
//! - [`bridge`] - alert and permission prompt adapters feeding the UI loop
//! - [`runner`] - the event loop

pub mod bridge;
pub mod guard;
pub mod runner;

pub use bridge::{ui_channel, TuiAlerter, TuiPrompt};
pub use guard::TerminalGuard;
pub use runner::TuiRunner;
