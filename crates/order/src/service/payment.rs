use crate::{
    abstract_trait::payment::PaymentGatewayTrait,
    domain::response::payment::PaymentIntent,
    model::payment_event::{PaymentEvent, PaymentEventType},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use shared::errors::ServiceError;
use std::{collections::HashMap, time::Duration};
use tracing::{error, info, warn};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
pub struct StripeSettings {
    pub api_base: String,
    pub secret_key: String,
    pub webhook_secret: String,
    pub tolerance_secs: i64,
    pub timeout: Duration,
}

/// Stripe-compatible payment intents and signed webhooks.
#[derive(Debug, Clone)]
pub struct StripeGateway {
    settings: StripeSettings,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: Option<String>,
    amount: i64,
    currency: String,
}

impl StripeGateway {
    pub fn new(settings: StripeSettings) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ServiceError::Internal(format!("Failed to build payment client: {e}")))?;

        Ok(Self { settings, http })
    }
}

#[async_trait]
impl PaymentGatewayTrait for StripeGateway {
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<PaymentIntent, ServiceError> {
        if self.settings.secret_key.is_empty() {
            return Err(ServiceError::Dependency(
                "Payment provider is not configured".into(),
            ));
        }

        let url = format!(
            "{}/v1/payment_intents",
            self.settings.api_base.trim_end_matches('/')
        );

        let mut params: Vec<(String, String)> = vec![
            ("amount".into(), amount.to_string()),
            ("currency".into(), currency.to_lowercase()),
            ("automatic_payment_methods[enabled]".into(), "true".into()),
        ];
        params.extend(
            metadata
                .iter()
                .map(|(key, value)| (format!("metadata[{key}]"), value.clone())),
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.settings.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!("❌ Payment intent request failed: {e}");
                ServiceError::Dependency(format!("Payment provider request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            error!("❌ Payment provider returned {status}: {text}");
            return Err(ServiceError::Dependency(format!(
                "Payment provider returned {status}"
            )));
        }

        let parsed: IntentResponse = response.json().await.map_err(|e| {
            ServiceError::Dependency(format!("Invalid payment provider response: {e}"))
        })?;

        info!("✅ Created payment intent {}", parsed.id);

        Ok(PaymentIntent {
            intent_id: parsed.id,
            client_secret: parsed.client_secret.unwrap_or_default(),
            amount: parsed.amount,
            currency: parsed.currency,
        })
    }

    fn verify_and_parse_webhook(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<PaymentEvent, ServiceError> {
        verify_signature(
            payload,
            signature_header,
            &self.settings.webhook_secret,
            self.settings.tolerance_secs,
            Utc::now(),
        )?;
        parse_event(payload)
    }
}

fn signature_error(reason: &str) -> ServiceError {
    warn!("⚠️ Rejected webhook: {reason}");
    ServiceError::Signature(reason.to_string())
}

/// Checks a `t=<unix>,v1=<hex>` header against HMAC-SHA256 of `"{t}.{payload}"`.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    if secret.is_empty() {
        return Err(signature_error("webhook secret is not configured"));
    }

    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<Vec<u8>> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => {
                if let Ok(bytes) = hex::decode(value) {
                    signatures.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| signature_error("missing timestamp"))?;
    if signatures.is_empty() {
        return Err(signature_error("missing v1 signature"));
    }

    if (now.timestamp() - timestamp).abs() > tolerance_secs {
        return Err(signature_error("timestamp outside tolerance"));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| signature_error("invalid webhook secret"))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    let matched = signatures
        .iter()
        .any(|candidate| mac.clone().verify_slice(candidate).is_ok());

    if matched {
        Ok(())
    } else {
        Err(signature_error("signature mismatch"))
    }
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    created: i64,
    #[serde(default)]
    data: RawEventData,
}

#[derive(Debug, Default, Deserialize)]
struct RawEventData {
    #[serde(default)]
    object: Value,
}

/// Extracts the fields the settlement logic needs from a verified payload.
pub fn parse_event(payload: &[u8]) -> Result<PaymentEvent, ServiceError> {
    let raw: RawEvent = serde_json::from_slice(payload)
        .map_err(|e| ServiceError::validation(format!("Malformed webhook payload: {e}")))?;

    let object = &raw.data.object;
    let metadata = &object["metadata"];
    let order_id = ["order_id", "orderId"]
        .iter()
        .find_map(|key| metadata[*key].as_str())
        .map(str::to_string);

    let created = DateTime::from_timestamp(raw.created, 0)
        .ok_or_else(|| ServiceError::validation("Webhook timestamp is out of range"))?;

    Ok(PaymentEvent {
        event_id: raw.id,
        kind: PaymentEventType::from_provider(&raw.event_type),
        order_id,
        created,
        amount: object["amount"].as_i64(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "whsec_test";

    fn sign(payload: &[u8], timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(format!("{timestamp}.").as_bytes());
        mac.update(payload);
        format!(
            "t={timestamp},v1={}",
            hex::encode(mac.finalize().into_bytes())
        )
    }

    fn payload() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_1",
            "type": "payment_intent.succeeded",
            "created": 1_700_000_000,
            "data": { "object": { "amount": 9300, "metadata": { "order_id": "abc" } } }
        }))
        .unwrap()
    }

    #[test]
    fn valid_signature_is_accepted() {
        let now = Utc::now();
        let body = payload();

        assert!(verify_signature(&body, &sign(&body, now.timestamp()), SECRET, 300, now).is_ok());
    }

    #[test]
    fn tampered_body_is_rejected() {
        let now = Utc::now();
        let header = sign(&payload(), now.timestamp());

        let result = verify_signature(b"{\"id\":\"evt_2\"}", &header, SECRET, 300, now);
        assert!(matches!(result, Err(ServiceError::Signature(_))));
    }

    #[test]
    fn old_timestamp_is_rejected() {
        let now = Utc::now();
        let body = payload();
        let header = sign(&body, now.timestamp() - 600);

        let result = verify_signature(&body, &header, SECRET, 300, now);
        assert!(matches!(result, Err(ServiceError::Signature(_))));
    }

    #[test]
    fn any_matching_v1_is_accepted() {
        let now = Utc::now();
        let body = payload();
        let header = format!("{},v1=deadbeef", sign(&body, now.timestamp()));

        assert!(verify_signature(&body, &header, SECRET, 300, now).is_ok());
    }

    #[test]
    fn header_without_signature_is_rejected() {
        let result = verify_signature(&payload(), "t=1700000000", SECRET, 300, Utc::now());
        assert!(matches!(result, Err(ServiceError::Signature(_))));
    }

    #[test]
    fn event_fields_are_extracted() {
        let event = parse_event(&payload()).unwrap();

        assert_eq!(event.event_id, "evt_1");
        assert_eq!(event.kind, PaymentEventType::Succeeded);
        assert_eq!(event.order_id.as_deref(), Some("abc"));
        assert_eq!(event.amount, Some(9300));
        assert_eq!(event.created.timestamp(), 1_700_000_000);
    }

    #[test]
    fn camel_case_order_id_is_accepted() {
        let body = serde_json::to_vec(&json!({
            "id": "evt_2",
            "type": "payment_intent.payment_failed",
            "created": 1_700_000_000,
            "data": { "object": { "metadata": { "orderId": "xyz" } } }
        }))
        .unwrap();

        let event = parse_event(&body).unwrap();
        assert_eq!(event.kind, PaymentEventType::Failed);
        assert_eq!(event.order_id.as_deref(), Some("xyz"));
    }
}
