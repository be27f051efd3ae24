//! MSG91 SMS channel
//!
//! Sends through the v5 flow endpoint. Any HTTP 200 counts as accepted.

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use tracing::{info, warn};
use uuid::Uuid;

use pv_core::services::delivery::DeliveryChannel;
use pv_shared::config::Msg91Config;
use pv_shared::utils::phone::{digits_only, mask_phone_number, to_e164};

use crate::InfrastructureError;

pub const DEFAULT_BASE_URL: &str = "https://control.msg91.com";

pub struct Msg91Channel {
    client: reqwest::Client,
    auth_key: String,
    sender_id: String,
    base_url: String,
}

impl Msg91Channel {
    pub fn new(config: &Msg91Config) -> Result<Self, InfrastructureError> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Point the channel at another host (used by tests)
    pub fn with_base_url(
        config: &Msg91Config,
        base_url: impl Into<String>,
    ) -> Result<Self, InfrastructureError> {
        if config.auth_key.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "MSG91_AUTH_KEY must not be empty".to_string(),
            ));
        }

        Ok(Self {
            client: super::http_client()?,
            auth_key: config.auth_key.clone(),
            sender_id: config.sender_id.clone(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/v5/flow/", self.base_url)
    }

    /// Request body for one message to one recipient
    pub fn payload(&self, phone: &str, message: &str) -> JsonValue {
        json!({
            "sender": self.sender_id,
            "route": "4",
            "country": "91",
            "sms": [
                {
                    "message": message,
                    "to": [digits_only(&to_e164(phone))],
                }
            ],
        })
    }

    async fn send(&self, phone: &str, message: &str) -> Result<String, InfrastructureError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("authkey", &self.auth_key)
            .json(&self.payload(phone, message))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status != reqwest::StatusCode::OK {
            return Err(InfrastructureError::Sms(format!(
                "MSG91 API error: {} - {}",
                status.as_u16(),
                body
            )));
        }

        // The request id comes back in `message`; fall back to a local id.
        let message_id = serde_json::from_str::<JsonValue>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| format!("msg91-{}", Uuid::new_v4()));

        Ok(message_id)
    }
}

#[async_trait]
impl DeliveryChannel for Msg91Channel {
    fn provider_name(&self) -> &str {
        "msg91"
    }

    async fn send_sms(&self, phone: &str, message: &str) -> Result<String, String> {
        match self.send(phone, message).await {
            Ok(message_id) => {
                info!(phone = %mask_phone_number(phone), "MSG91 SMS sent");
                Ok(message_id)
            }
            Err(e) => {
                warn!(phone = %mask_phone_number(phone), error = %e, "MSG91 send failed");
                Err(e.to_string())
            }
        }
    }
}
