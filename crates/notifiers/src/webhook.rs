//! Webhook notifier.
//!
//! POSTs each message as JSON to a mail relay endpoint. When a shared
//! secret is configured the raw body is signed with HMAC-SHA256 and the
//! hex digest sent as `X-Consequences-Signature: sha256=<hex>`, so the relay
//! can reject forged requests.

use std::time::Duration;

use async_trait::async_trait;
use consequences_core::{DeliveryError, Notifier, OutboundMessage};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Consequences-Signature";

/// Webhook notifier configuration.
#[derive(Clone)]
pub struct WebhookConfig {
    /// Relay endpoint
    pub url: String,
    /// HMAC shared secret. Empty or `None` = unsigned.
    pub shared_secret: Option<String>,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("url", &self.url)
            .field(
                "shared_secret",
                &self.shared_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

pub struct WebhookNotifier {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self, DeliveryError> {
        if !config.url.starts_with("http://") && !config.url.starts_with("https://") {
            return Err(DeliveryError::NotConfigured(format!(
                "webhook URL must start with http:// or https://, got '{}'",
                config.url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DeliveryError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// `sha256=<hex>` signature of `payload`, or `None` without a secret.
    pub fn sign(&self, payload: &[u8]) -> Option<String> {
        let secret = self.config.shared_secret.as_deref().filter(|s| !s.is_empty())?;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
        mac.update(payload);
        Some(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
    }
}

/// Check a `sha256=<hex>` (or bare hex) signature in constant time.
pub fn verify_signature(secret: &str, payload: &[u8], signature: &str) -> bool {
    let sig_hex = signature.strip_prefix("sha256=").unwrap_or(signature);
    let Ok(provided) = hex::decode(sig_hex) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&provided).is_ok()
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, address: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        let message = OutboundMessage::new(address, subject, body);
        let payload = serde_json::to_vec(&message).map_err(|e| DeliveryError::Failed {
            recipient: address.to_string(),
            reason: e.to_string(),
        })?;

        let mut request = self
            .client
            .post(&self.config.url)
            .header("Content-Type", "application/json");
        if let Some(signature) = self.sign(&payload) {
            request = request.header(SIGNATURE_HEADER, signature);
        }

        debug!(to = %address, url = %self.config.url, "Posting message to relay");

        let response = request
            .body(payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %error_body, "Relay rejected message");
            return Err(DeliveryError::Rejected {
                status_code: status.as_u16(),
                message: error_body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier(secret: Option<&str>) -> WebhookNotifier {
        WebhookNotifier::new(WebhookConfig {
            url: "https://relay.example.com/send".into(),
            shared_secret: secret.map(String::from),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn signature_round_trips() {
        let payload = br#"{"to":"ann@example.com"}"#;
        let signature = notifier(Some("s3cret")).sign(payload).unwrap();
        assert!(signature.starts_with("sha256="));
        assert!(verify_signature("s3cret", payload, &signature));
        assert!(!verify_signature("other", payload, &signature));
        assert!(!verify_signature("s3cret", b"tampered", &signature));
    }

    #[test]
    fn no_secret_means_unsigned() {
        assert!(notifier(None).sign(b"x").is_none());
        assert!(notifier(Some("")).sign(b"x").is_none());
    }

    #[test]
    fn invalid_hex_signature_rejected() {
        assert!(!verify_signature("s3cret", b"x", "sha256=not-hex"));
    }

    #[test]
    fn rejects_non_http_url() {
        let result = WebhookNotifier::new(WebhookConfig {
            url: "smtp://mail.example.com".into(),
            shared_secret: None,
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(DeliveryError::NotConfigured(_))));
    }

    #[test]
    fn debug_redacts_secret() {
        let config = WebhookConfig {
            url: "https://relay.example.com".into(),
            shared_secret: Some("s3cret".into()),
            timeout_secs: 5,
        };
        assert!(!format!("{config:?}").contains("s3cret"));
    }

    #[tokio::test]
    async fn unreachable_relay_is_network_error() {
        let notifier = WebhookNotifier::new(WebhookConfig {
            url: "http://127.0.0.1:9/send".into(),
            shared_secret: None,
            timeout_secs: 2,
        })
        .unwrap();
        let err = notifier.send("ann@example.com", "Hi", "body").await.unwrap_err();
        assert!(matches!(err, DeliveryError::Network(_)));
    }
}
