use crate::{abstract_trait::notification::NotificationChannelTrait, model::notification::Channel};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::errors::ServiceError;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct SmsSettings {
    pub enabled: bool,
    pub api_base: String,
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: Option<String>,
}

/// Twilio-compatible SMS delivery over the Messages REST resource.
#[derive(Debug, Clone)]
pub struct SmsChannel {
    settings: SmsSettings,
    http: Client,
}

impl SmsChannel {
    pub fn new(settings: SmsSettings) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ServiceError::Internal(format!("Failed to build SMS client: {e}")))?;

        Ok(Self { settings, http })
    }
}

#[async_trait]
impl NotificationChannelTrait for SmsChannel {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    fn is_enabled(&self) -> bool {
        self.settings.enabled
            && !self.settings.account_sid.is_empty()
            && !self.settings.from_number.is_empty()
    }

    async fn deliver(
        &self,
        destination: &str,
        _subject: &str,
        body: &str,
    ) -> Result<Option<String>, ServiceError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.account_sid
        );

        let params = [
            ("To", destination),
            ("From", self.settings.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.settings.account_sid, Some(&self.settings.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!("❌ SMS request to {destination} failed: {e}");
                ServiceError::Dependency(format!("SMS request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ServiceError::Dependency(format!(
                "SMS provider returned {status}: {text}"
            )));
        }

        let parsed: MessageResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Dependency(format!("Invalid SMS provider response: {e}")))?;

        info!("✅ SMS accepted for {destination}");
        Ok(parsed.sid)
    }
}
