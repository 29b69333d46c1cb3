//! Notifier implementations for the Consequences game.
//!
//! Available notifiers:
//! - **Console** — prints each message to stdout
//! - **Outbox** — appends each message to a JSON-lines file
//! - **Webhook** — POSTs each message to a mail relay, optionally signed
//! - **Recording** — keeps messages in memory (tests and previews)

pub mod console;
pub mod outbox;
pub mod recording;
pub mod webhook;

use std::sync::Arc;

use consequences_config::{DeliveryConfig, NotifierKind};
use consequences_core::{DeliveryError, Notifier};

pub use console::ConsoleNotifier;
pub use outbox::OutboxNotifier;
pub use recording::RecordingNotifier;
pub use webhook::{WebhookConfig, WebhookNotifier};

/// Build the notifier selected in configuration.
pub fn from_config(config: &DeliveryConfig) -> Result<Arc<dyn Notifier>, DeliveryError> {
    match config.notifier {
        NotifierKind::Console => Ok(Arc::new(ConsoleNotifier::new())),
        NotifierKind::Outbox => {
            let path = config.outbox_path.clone().ok_or_else(|| {
                DeliveryError::NotConfigured("delivery.outbox_path is not set".into())
            })?;
            Ok(Arc::new(OutboxNotifier::new(path)))
        }
        NotifierKind::Webhook => {
            let url = config.webhook_url.clone().ok_or_else(|| {
                DeliveryError::NotConfigured("delivery.webhook_url is not set".into())
            })?;
            let notifier = WebhookNotifier::new(WebhookConfig {
                url,
                shared_secret: config.webhook_secret.clone(),
                timeout_secs: config.timeout_secs,
            })?;
            Ok(Arc::new(notifier))
        }
    }
}
