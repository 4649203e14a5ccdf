//! Single-slot, last-write-wins state cell.
//!
//! Backed by a `tokio::sync::watch` channel: one writer replaces the value,
//! any number of readers observe the latest one. No history is kept.

use tokio::sync::watch;

/// Holds at most one value; each write supersedes the previous.
#[derive(Debug)]
pub struct StateSlot<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> StateSlot<T> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Replaces the current value.
    pub fn set(&self, value: T) {
        self.tx.send_replace(Some(value));
    }

    /// Clone of the current value.
    pub fn get(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every write (for render loops).
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Default for StateSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
