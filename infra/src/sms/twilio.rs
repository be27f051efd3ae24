//! Twilio SMS channel
//!
//! ## Features
//!
//! - E.164 validation with the `phonenumber` crate, assuming India (+91)
//!   for bare ten-digit numbers
//! - Retry with exponential backoff on rate limits and server errors
//! - No retry on client errors
//! - Phone numbers masked in logs

use async_trait::async_trait;
use phonenumber::{Mode, PhoneNumber};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use twilio::{Client, OutboundMessage};

use pv_core::services::delivery::DeliveryChannel;
use pv_shared::config::TwilioConfig;
use pv_shared::utils::phone::{mask_phone_number, to_e164};

use crate::InfrastructureError;

/// Twilio's body limit
const MAX_MESSAGE_LENGTH: usize = 1600;

/// Retry behaviour for Twilio requests
#[derive(Debug, Clone, Copy)]
pub struct TwilioRetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for TwilioRetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

pub struct TwilioChannel {
    client: Client,
    from_number: String,
    retry: TwilioRetryPolicy,
}

impl TwilioChannel {
    pub fn new(config: &TwilioConfig) -> Result<Self, InfrastructureError> {
        Self::with_retry_policy(config, TwilioRetryPolicy::default())
    }

    pub fn with_retry_policy(
        config: &TwilioConfig,
        retry: TwilioRetryPolicy,
    ) -> Result<Self, InfrastructureError> {
        if !config.from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_FROM must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        let client = Client::new(&config.account_sid, &config.auth_token);
        info!(
            from = %mask_phone_number(&config.from_number),
            "Twilio SMS channel initialized"
        );

        Ok(Self {
            client,
            from_number: config.from_number.clone(),
            retry,
        })
    }

    /// Normalize to E.164 and reject numbers `phonenumber` cannot parse
    pub fn validate_phone_number(phone: &str) -> Result<String, InfrastructureError> {
        let candidate = to_e164(phone);
        match candidate.parse::<PhoneNumber>() {
            Ok(parsed) => {
                let formatted = parsed.format().mode(Mode::E164).to_string();
                debug!(phone = %mask_phone_number(&formatted), "Validated phone number");
                Ok(formatted)
            }
            Err(e) => Err(InfrastructureError::Sms(format!(
                "Invalid phone number format: {}",
                e
            ))),
        }
    }

    async fn send_with_retry(&self, to: &str, message: &str) -> Result<String, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = self.retry.retry_delay;

        loop {
            attempts += 1;
            let outbound = OutboundMessage::new(&self.from_number, to, message);

            match self.client.send_message(outbound).await {
                Ok(response) => {
                    info!(
                        phone = %mask_phone_number(to),
                        sid = %response.sid,
                        "Twilio SMS sent"
                    );
                    return Ok(response.sid);
                }
                Err(e) => {
                    let error_msg = e.to_string();
                    error!(
                        attempt = attempts,
                        max_retries = self.retry.max_retries,
                        error = %error_msg,
                        "Twilio send failed"
                    );

                    if attempts >= self.retry.max_retries {
                        return Err(InfrastructureError::Sms(format!(
                            "Failed to send SMS after {} attempts: {}",
                            attempts, error_msg
                        )));
                    }

                    if error_msg.contains("400") || error_msg.contains("invalid") {
                        return Err(InfrastructureError::Sms(format!(
                            "Invalid request: {}",
                            error_msg
                        )));
                    }

                    warn!(delay = ?delay, "Retrying Twilio send");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }

    async fn send(&self, phone: &str, message: &str) -> Result<String, InfrastructureError> {
        if message.len() > MAX_MESSAGE_LENGTH {
            return Err(InfrastructureError::Sms(format!(
                "Message exceeds maximum length of {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }

        let to = Self::validate_phone_number(phone)?;
        self.send_with_retry(&to, message).await
    }
}

#[async_trait]
impl DeliveryChannel for TwilioChannel {
    fn provider_name(&self) -> &str {
        "twilio"
    }

    async fn send_sms(&self, phone: &str, message: &str) -> Result<String, String> {
        self.send(phone, message).await.map_err(|e| e.to_string())
    }
}
