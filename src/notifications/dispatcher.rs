//! Notification dispatch: local scheduling and remote push.
//!
//! The two paths share nothing. A local notification is handed to the OS
//! service with a time-interval trigger. A remote notification is posted to
//! the push relay from a spawned task after a fixed delay, so the operator
//! has time to background the app.

// Rust guideline compliant 2026-02

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::payload::{NotificationPayload, PushMessage};
use super::relay::PushRelay;
use super::service::{NotificationService, Trigger};
use crate::error::NotifyError;

/// Issues local and remote notifications.
pub struct Dispatcher {
    service: Arc<dyn NotificationService>,
    relay: Arc<dyn PushRelay>,
    local_delay: Duration,
    remote_delay: Duration,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("local_delay", &self.local_delay)
            .field("remote_delay", &self.remote_delay)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher with the given delays.
    pub fn new(
        service: Arc<dyn NotificationService>,
        relay: Arc<dyn PushRelay>,
        local_delay: Duration,
        remote_delay: Duration,
    ) -> Self {
        Self {
            service,
            relay,
            local_delay,
            remote_delay,
        }
    }

    /// Schedules the fixed local notification and returns its identifier.
    ///
    /// Failures are returned to the caller untouched.
    pub async fn schedule_local(&self) -> Result<String, NotifyError> {
        let identifier = self
            .service
            .schedule(
                NotificationPayload::local_mail(),
                Trigger::TimeInterval(self.local_delay),
            )
            .await?;
        log::info!(
            "[Dispatcher] Scheduled local notification {identifier} in {:?}",
            self.local_delay
        );
        Ok(identifier)
    }

    /// Sends the fixed remote message to `token` after the remote delay.
    ///
    /// Returns immediately. The returned handle resolves once the request
    /// has been attempted; dropping it does not cancel the send. An empty
    /// token is sent as-is.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn send_remote(&self, token: &str) -> JoinHandle<Result<(), NotifyError>> {
        let message = PushMessage::remote_demo(token);
        let relay = Arc::clone(&self.relay);
        let delay = self.remote_delay;

        if token.is_empty() {
            log::warn!("[Dispatcher] Sending remote push without a token");
        }
        log::info!("[Dispatcher] Remote push queued, sending in {delay:?}");

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = relay.send(&message).await;
            if let Err(e) = &result {
                log::error!("[Dispatcher] Remote push failed: {e}");
            }
            result
        })
    }
}
