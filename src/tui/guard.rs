//! Terminal state guard for RAII cleanup.
//!
//! [`TerminalGuard::enter`] switches the terminal into raw mode on the
//! alternate screen; dropping the guard restores it, including during a
//! panic unwind.

use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Restores the terminal when dropped.
#[derive(Debug)]
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Enables raw mode and enters the alternate screen.
    ///
    /// If entering the alternate screen fails, raw mode is undone before
    /// the error is returned.
    pub fn enter() -> std::io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self { _private: () };
        execute!(std::io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }

    /// Restores the terminal without a guard (used by the panic hook).
    pub fn restore() {
        // Best effort: the terminal may already be restored.
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen, Show);
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        Self::restore();
    }
}
