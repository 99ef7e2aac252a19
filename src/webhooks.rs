//! Outbound webhook notifications for domain events.
//!
//! Payloads are HMAC-SHA256 signed over `timestamp.body` so receivers can
//! authenticate deliveries and reject replays outside their tolerance window.

use crate::errors::ServiceError;
use crate::events::Event;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// HMAC signature generator for webhook authentication
pub struct SignatureGenerator {
    secret: String,
}

impl SignatureGenerator {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Generate HMAC signature for a webhook payload
    pub fn sign_payload(&self, timestamp: &str, body: &str) -> String {
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        type HmacSha256 = Hmac<Sha256>;

        let signed_payload = format!("{}.{}", timestamp, body);
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signed_payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Envelope wrapping a domain event for delivery
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    event: &'a str,
    #[serde(flatten)]
    body: &'a Event,
}

/// Webhook delivery service for domain events
#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    signature_generator: Option<Arc<SignatureGenerator>>,
    max_retries: u32,
}

impl WebhookNotifier {
    pub fn new(webhook_secret: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            signature_generator: webhook_secret
                .map(|secret| Arc::new(SignatureGenerator::new(secret))),
            max_retries: 3,
        }
    }

    /// Send a webhook with retry logic
    #[instrument(skip(self, event))]
    async fn send_webhook(&self, webhook_url: &str, event: Event) -> Result<(), ServiceError> {
        let payload = WebhookPayload {
            event: event.name(),
            body: &event,
        };
        let body = serde_json::to_string(&payload)
            .map_err(|e| ServiceError::SerializationError(e.to_string()))?;

        let timestamp = chrono::Utc::now().to_rfc3339();

        let signature = self
            .signature_generator
            .as_ref()
            .map(|generator| generator.sign_payload(&timestamp, &body));

        // Exponential backoff: 1s, 2s, 4s
        for attempt in 1..=self.max_retries {
            let mut request = self
                .client
                .post(webhook_url)
                .header("Content-Type", "application/json")
                .header("X-Webhook-Timestamp", &timestamp)
                .body(body.clone());

            if let Some(ref sig) = signature {
                request = request.header("X-Webhook-Signature", sig);
            }

            match request.send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        info!(event = event.name(), "Webhook delivered to {}", webhook_url);
                        return Ok(());
                    } else {
                        warn!(
                            "Webhook delivery failed with status: {} (attempt {}/{})",
                            response.status(),
                            attempt,
                            self.max_retries
                        );
                    }
                }
                Err(e) => {
                    warn!(
                        "Webhook delivery error: {} (attempt {}/{})",
                        e, attempt, self.max_retries
                    );
                }
            }

            if attempt < self.max_retries {
                let backoff = Duration::from_secs(2_u64.pow(attempt - 1));
                tokio::time::sleep(backoff).await;
            }
        }

        error!(
            "Webhook delivery failed after {} attempts",
            self.max_retries
        );
        Err(ServiceError::ExternalServiceError(format!(
            "Failed to deliver webhook after {} retries",
            self.max_retries
        )))
    }

    /// Send a webhook asynchronously (fire-and-forget with logging)
    pub fn send_async(&self, webhook_url: String, event: Event) {
        let service = self.clone();

        tokio::spawn(async move {
            if let Err(e) = service.send_webhook(&webhook_url, event).await {
                error!("Async webhook delivery failed: {}", e);
            }
        });
    }
}

impl Default for WebhookNotifier {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn signature_generation_is_stable_hex() {
        let generator = SignatureGenerator::new("test_secret".to_string());
        let timestamp = "2025-01-01T00:00:00Z";
        let body = r#"{"event":"asset_created"}"#;

        let first = generator.sign_payload(timestamp, body);
        let second = generator.sign_payload(timestamp, body);
        assert_eq!(first, second);
        assert_eq!(first.len(), 64); // SHA256 produces 32 bytes = 64 hex chars
    }

    #[test]
    fn signature_varies_with_timestamp() {
        let generator = SignatureGenerator::new("test_secret".to_string());
        let body = r#"{"event":"asset_created"}"#;

        let one = generator.sign_payload("2025-01-01T00:00:00Z", body);
        let two = generator.sign_payload("2025-01-01T00:00:01Z", body);
        assert_ne!(one, two);
    }

    #[test]
    fn payload_envelope_carries_event_name() {
        let event = Event::ShipmentDelivered(Uuid::nil());
        let payload = WebhookPayload {
            event: event.name(),
            body: &event,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""event":"shipment_delivered""#));
        assert!(json.contains("ShipmentDelivered"));
    }
}
