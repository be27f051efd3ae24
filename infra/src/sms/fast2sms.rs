//! Fast2SMS channel
//!
//! Quick-route HTTP GET. Success is signalled by `"return": true` in the
//! JSON body, not by the status code.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{info, warn};
use uuid::Uuid;

use pv_core::services::delivery::DeliveryChannel;
use pv_shared::config::Fast2SmsConfig;
use pv_shared::utils::phone::{last_ten_digits, mask_phone_number};

use crate::InfrastructureError;

pub const DEFAULT_BASE_URL: &str = "https://www.fast2sms.com";

/// Fields of the Fast2SMS response we act on
#[derive(Debug, Deserialize)]
pub struct Fast2SmsResponse {
    #[serde(rename = "return", default)]
    pub accepted: bool,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub message: Option<JsonValue>,
}

impl Fast2SmsResponse {
    /// Provider message id on success, provider error text otherwise
    pub fn into_result(self) -> Result<String, InfrastructureError> {
        if self.accepted {
            return Ok(self
                .request_id
                .unwrap_or_else(|| format!("fast2sms-{}", Uuid::new_v4())));
        }

        let reason = match self.message {
            Some(JsonValue::String(s)) => s,
            Some(JsonValue::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            _ => "Unknown error".to_string(),
        };
        Err(InfrastructureError::Sms(format!("Fast2SMS error: {}", reason)))
    }
}

pub struct Fast2SmsChannel {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl Fast2SmsChannel {
    pub fn new(config: &Fast2SmsConfig) -> Result<Self, InfrastructureError> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Point the channel at another host (used by tests)
    pub fn with_base_url(
        config: &Fast2SmsConfig,
        base_url: impl Into<String>,
    ) -> Result<Self, InfrastructureError> {
        if config.api_key.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "FAST2SMS_API_KEY must not be empty".to_string(),
            ));
        }

        Ok(Self {
            client: super::http_client()?,
            api_key: config.api_key.clone(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/smshttp", self.base_url)
    }

    /// Query parameters for one message to one recipient
    pub fn query(&self, phone: &str, message: &str) -> Vec<(&'static str, String)> {
        vec![
            ("authorization", self.api_key.clone()),
            ("route", "q".to_string()),
            ("message", message.to_string()),
            ("language", "english".to_string()),
            ("flash", "0".to_string()),
            ("numbers", last_ten_digits(phone)),
        ]
    }

    /// The API key travels in the query string, so URLs are stripped from errors.
    async fn send(&self, phone: &str, message: &str) -> Result<String, InfrastructureError> {
        let body = self
            .client
            .get(self.endpoint())
            .query(&self.query(phone, message))
            .send()
            .await
            .map_err(|e| InfrastructureError::Http(e.without_url()))?
            .text()
            .await
            .map_err(|e| InfrastructureError::Http(e.without_url()))?;

        let parsed: Fast2SmsResponse = serde_json::from_str(&body).map_err(|e| {
            InfrastructureError::Sms(format!("Fast2SMS parse error: {}", e))
        })?;
        parsed.into_result()
    }
}

#[async_trait]
impl DeliveryChannel for Fast2SmsChannel {
    fn provider_name(&self) -> &str {
        "fast2sms"
    }

    async fn send_sms(&self, phone: &str, message: &str) -> Result<String, String> {
        match self.send(phone, message).await {
            Ok(message_id) => {
                info!(phone = %mask_phone_number(phone), "Fast2SMS SMS sent");
                Ok(message_id)
            }
            Err(e) => {
                warn!(phone = %mask_phone_number(phone), error = %e, "Fast2SMS send failed");
                Err(e.to_string())
            }
        }
    }
}
