//! Notifier trait — the abstraction over message delivery.
//!
//! A Notifier delivers one message to one address. Delivery is
//! at-least-once per recipient and never atomic across a batch: a failure
//! for one participant does not undo messages already sent to others.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

/// A message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Recipient address
    pub to: String,

    /// Subject line
    pub subject: String,

    /// Plain-text body
    pub body: String,
}

impl OutboundMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// The core Notifier trait.
///
/// Implementations handle transport-specific formatting, signing, and
/// error mapping.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Human-readable notifier name (e.g., "console", "webhook").
    fn name(&self) -> &str;

    /// Send one message.
    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), DeliveryError>;

    /// Health check — can the notifier currently deliver?
    async fn health_check(&self) -> Result<bool, DeliveryError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullNotifier;

    #[async_trait]
    impl Notifier for NullNotifier {
        fn name(&self) -> &str {
            "null"
        }

        async fn send(&self, _address: &str, _subject: &str, _body: &str) -> Result<(), DeliveryError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn default_health_check_is_healthy() {
        let notifier = NullNotifier;
        assert!(notifier.health_check().await.unwrap());
        assert!(notifier.send("a@example.com", "hi", "body").await.is_ok());
    }

    #[test]
    fn outbound_message_serialization() {
        let msg = OutboundMessage::new("ann@example.com", "Your consequence", "text");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"to\":\"ann@example.com\""));
        assert!(json.contains("Your consequence"));
    }
}
