//! Recording notifier — keeps every message in memory.

use std::collections::HashSet;

use async_trait::async_trait;
use consequences_core::{DeliveryError, Notifier, OutboundMessage};
use tokio::sync::RwLock;

/// Stores sent messages; addresses listed in `failing` are refused.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: RwLock<Vec<OutboundMessage>>,
    failing: HashSet<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that refuses the given addresses.
    pub fn failing_for<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sent: RwLock::new(Vec::new()),
            failing: addresses.into_iter().map(Into::into).collect(),
        }
    }

    pub async fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        if self.failing.contains(address) {
            return Err(DeliveryError::Failed {
                recipient: address.to_string(),
                reason: "address refused".into(),
            });
        }
        self.sent
            .write()
            .await
            .push(OutboundMessage::new(address, subject, body));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_and_refuses() {
        let notifier = RecordingNotifier::failing_for(["bob@example.com"]);
        notifier.send("ann@example.com", "s", "b").await.unwrap();
        assert!(notifier.send("bob@example.com", "s", "b").await.is_err());

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], OutboundMessage::new("ann@example.com", "s", "b"));
    }
}
