//! Push-relay client.
//!
//! Posts a [`PushMessage`] envelope to the Expo push endpoint, which forwards
//! it to the device addressed by the token. The response body is not
//! consumed: a request that reaches the relay counts as sent.

// Rust guideline compliant 2026-02

use async_trait::async_trait;

use super::payload::PushMessage;
use crate::error::NotifyError;

/// Remote push delivery.
#[async_trait]
pub trait PushRelay: Send + Sync {
    /// Sends one message. No retry.
    async fn send(&self, message: &PushMessage) -> Result<(), NotifyError>;
}

/// [`PushRelay`] backed by the Expo HTTP push API.
///
/// The caller should reuse one client for connection pooling. No request
/// timeout is configured.
#[derive(Debug, Clone)]
pub struct ExpoPushClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ExpoPushClient {
    /// Creates a client posting to `endpoint`.
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint messages are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PushRelay for ExpoPushClient {
    async fn send(&self, message: &PushMessage) -> Result<(), NotifyError> {
        let body = serde_json::to_vec(message)?;

        // Accept-Encoding is set explicitly so reqwest does not substitute its own list.
        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .header("Accept-Encoding", "gzip, deflate")
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        log::info!(
            "[Relay] Push sent to {:?} (HTTP {})",
            message.to,
            response.status().as_u16()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ExpoPushClient::new(
            reqwest::Client::new(),
            "https://exp.host/--/api/v2/push/send",
        );
        assert_eq!(client.endpoint(), "https://exp.host/--/api/v2/push/send");
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_network_failure() {
        let client = ExpoPushClient::new(reqwest::Client::new(), "http://127.0.0.1:9/push");
        let result = client.send(&PushMessage::remote_demo("tok")).await;
        assert!(matches!(result, Err(NotifyError::Network(_))));
    }
}
