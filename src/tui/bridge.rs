//! Bridges background tasks to the UI thread.
//!
//! The registrar and notification service run on the Tokio runtime, but
//! alerts and the permission prompt are drawn by the UI loop. These adapters
//! implement [`Alerter`] and [`PermissionPrompt`] by sending [`UiRequest`]s
//! over a channel the runner drains every frame.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::app::UiRequest;
use crate::notifications::{Alerter, PermissionPrompt};

/// Creates the request channel shared by [`TuiAlerter`] and [`TuiPrompt`].
pub fn ui_channel() -> (
    mpsc::UnboundedSender<UiRequest>,
    mpsc::UnboundedReceiver<UiRequest>,
) {
    mpsc::unbounded_channel()
}

/// Shows alerts as modal dialogs.
#[derive(Debug, Clone)]
pub struct TuiAlerter {
    tx: mpsc::UnboundedSender<UiRequest>,
}

impl TuiAlerter {
    /// Creates an alerter sending into the UI channel.
    pub fn new(tx: mpsc::UnboundedSender<UiRequest>) -> Self {
        Self { tx }
    }
}

impl Alerter for TuiAlerter {
    fn alert(&self, message: &str) {
        log::warn!("[Alert] {message}");
        if self.tx.send(UiRequest::Alert(message.to_string())).is_err() {
            log::debug!("[Alert] UI gone, alert not shown");
        }
    }
}

/// Asks for permission with a modal prompt and waits for the answer.
#[derive(Debug, Clone)]
pub struct TuiPrompt {
    tx: mpsc::UnboundedSender<UiRequest>,
}

impl TuiPrompt {
    /// Creates a prompt sending into the UI channel.
    pub fn new(tx: mpsc::UnboundedSender<UiRequest>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl PermissionPrompt for TuiPrompt {
    async fn ask(&self) -> bool {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(UiRequest::Permission(reply_tx)).is_err() {
            log::warn!("[Prompt] UI gone, treating permission as denied");
            return false;
        }
        // A dropped reply (UI closed) counts as a refusal.
        reply_rx.await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_alert_reaches_ui() {
        let (tx, mut rx) = ui_channel();
        TuiAlerter::new(tx).alert("hello");
        match rx.recv().await {
            Some(UiRequest::Alert(message)) => assert_eq!(message, "hello"),
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_prompt_waits_for_answer() {
        let (tx, mut rx) = ui_channel();
        let prompt = TuiPrompt::new(tx);
        let asking = tokio::spawn(async move { prompt.ask().await });

        match rx.recv().await {
            Some(UiRequest::Permission(reply)) => reply.send(true).expect("asker alive"),
            other => panic!("unexpected request: {other:?}"),
        }
        assert!(asking.await.expect("task"));
    }

    #[tokio::test]
    async fn test_prompt_without_ui_is_refused() {
        let (tx, rx) = ui_channel();
        drop(rx);
        assert!(!TuiPrompt::new(tx).ask().await);
    }
}
