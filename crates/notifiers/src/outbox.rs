//! Outbox notifier — appends every message to a JSON-lines file.
//!
//! Useful when another tool picks up and mails the messages, or simply to
//! keep a record of what each player received.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use consequences_core::{DeliveryError, Notifier};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// One line of the outbox file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxRecord {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

pub struct OutboxNotifier {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl OutboxNotifier {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    fn failed(&self, recipient: &str, reason: impl std::fmt::Display) -> DeliveryError {
        DeliveryError::Failed {
            recipient: recipient.to_string(),
            reason: format!("outbox {}: {reason}", self.path.display()),
        }
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    fn name(&self) -> &str {
        "outbox"
    }

    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        let record = OutboxRecord {
            to: address.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            sent_at: Utc::now(),
        };
        let mut line = serde_json::to_string(&record).map_err(|e| self.failed(address, e))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.failed(address, e))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.failed(address, e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.failed(address, e))?;
        file.flush().await.map_err(|e| self.failed(address, e))?;

        debug!(to = %address, path = %self.path.display(), "Message written to outbox");
        Ok(())
    }

    /// Ready when `send` could write: the nearest existing ancestor of the
    /// outbox is a directory, since missing directories are created on send.
    async fn health_check(&self) -> Result<bool, DeliveryError> {
        let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(true);
        };
        Ok(parent
            .ancestors()
            .find(|dir| dir.exists())
            .is_some_and(|dir| dir.is_dir()))
    }
}
