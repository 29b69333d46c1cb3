//! Console notifier — prints messages to stdout.
//!
//! The simplest notifier, used when the game host reads the consequences
//! out loud instead of mailing them.

use async_trait::async_trait;
use consequences_core::{DeliveryError, Notifier};
use tokio::io::{self, AsyncWriteExt};

pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// The text printed for one message.
pub fn format_message(address: &str, subject: &str, body: &str) -> String {
    format!("To: {address}\nSubject: {subject}\n\n{body}\n\n")
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        let mut stdout = io::stdout();
        stdout
            .write_all(format_message(address, subject, body).as_bytes())
            .await
            .map_err(|e| DeliveryError::Failed {
                recipient: address.to_string(),
                reason: e.to_string(),
            })?;
        stdout.flush().await.map_err(|e| DeliveryError::Failed {
            recipient: address.to_string(),
            reason: e.to_string(),
        })
    }
}
