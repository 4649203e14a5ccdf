//! Notification value types.
//!
//! [`NotificationPayload`] is what gets scheduled, [`NotificationEvent`] is
//! what gets delivered, [`NotificationResponse`] is what the user did with it,
//! and [`PushMessage`] is the envelope posted to the push relay.

// Rust guideline compliant 2026-02

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::DEFAULT_ACTION_IDENTIFIER;

/// Opaque token identifying this installation to the push relay.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PushToken(String);

impl PushToken {
    /// Wraps a token string issued by the push-relay SDK.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token is empty (no token obtained).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for PushToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content of a notification: title, body and free-form data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Arbitrary JSON data delivered alongside the notification.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl NotificationPayload {
    /// Creates a payload with empty data.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: Map::new(),
        }
    }

    /// Adds a data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// The fixed payload used for locally scheduled notifications.
    pub fn local_mail() -> Self {
        Self::new("You've got mail! 📬", "Here is the notification body")
            .with_data("data", "goes here")
    }

    /// Data rendered as compact JSON text, as shown on screen.
    pub fn data_json(&self) -> String {
        Value::Object(self.data.clone()).to_string()
    }
}

/// A delivered notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Identifier assigned when the notification was scheduled.
    pub identifier: String,
    /// Delivery time.
    pub date: DateTime<Utc>,
    /// Delivered content.
    pub payload: NotificationPayload,
}

impl NotificationEvent {
    /// Creates an event delivered now.
    pub fn delivered_now(identifier: impl Into<String>, payload: NotificationPayload) -> Self {
        Self {
            identifier: identifier.into(),
            date: Utc::now(),
            payload,
        }
    }
}

/// The user's interaction with a delivered notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationResponse {
    /// The notification that was interacted with.
    pub notification: NotificationEvent,
    /// Which action the user took.
    pub action_identifier: String,
}

impl NotificationResponse {
    /// Response for a tap on the notification body.
    pub fn default_action(notification: NotificationEvent) -> Self {
        Self {
            notification,
            action_identifier: DEFAULT_ACTION_IDENTIFIER.to_string(),
        }
    }
}

/// Message envelope posted to the push relay.
///
/// Field order matches the JSON the relay receives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Recipient push token. May be empty.
    pub to: String,
    /// Sound to play on delivery.
    pub sound: String,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Arbitrary JSON data.
    pub data: Map<String, Value>,
}

impl PushMessage {
    /// The fixed remote message addressed to `token`.
    ///
    /// An empty token is accepted; the relay decides what to do with it.
    pub fn remote_demo(token: &str) -> Self {
        let mut data = Map::new();
        data.insert("data".to_string(), Value::from("goes here"));
        Self {
            to: token.to_string(),
            sound: "default".to_string(),
            title: "Remoto via fetch".to_string(),
            body: "And here is the body!".to_string(),
            data,
        }
    }
}
