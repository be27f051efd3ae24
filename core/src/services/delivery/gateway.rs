//! Ordered-fallback delivery gateway

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use pv_shared::utils::phone::mask_phone_number;

use super::traits::DeliveryChannel;
use super::types::{DeliveryReceipt, DeliveryReport, ProviderFailure};

/// Tries each configured provider in order until one accepts the message.
///
/// Holds no mutable state: every call starts again from the first provider.
pub struct DeliveryGateway {
    channels: Vec<Arc<dyn DeliveryChannel>>,
    timeout: Duration,
}

impl DeliveryGateway {
    /// # Arguments
    ///
    /// * `channels` - Providers in priority order
    /// * `timeout` - Upper bound for a single provider call
    pub fn new(channels: Vec<Arc<dyn DeliveryChannel>>, timeout: Duration) -> Self {
        if channels.is_empty() {
            warn!("Delivery gateway created without providers; every delivery will fail");
        }
        Self { channels, timeout }
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.channels
            .iter()
            .map(|c| c.provider_name().to_string())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Deliver `message` to `phone`, falling back through providers.
    ///
    /// Never fails outright: the report says which provider (if any)
    /// accepted the message and why each earlier one did not.
    pub async fn deliver(&self, phone: &str, message: &str) -> DeliveryReport {
        let masked = mask_phone_number(phone);
        let mut report = DeliveryReport::default();

        for channel in &self.channels {
            let provider = channel.provider_name().to_string();

            let outcome = tokio::time::timeout(self.timeout, channel.send_sms(phone, message)).await;
            let reason = match outcome {
                Ok(Ok(message_id)) => {
                    info!(
                        provider = %provider,
                        phone = %masked,
                        message_id = %message_id,
                        "Verification code delivered"
                    );
                    report.receipt = Some(DeliveryReceipt {
                        provider,
                        message_id,
                    });
                    return report;
                }
                Ok(Err(reason)) => reason,
                Err(_) => format!("timed out after {}ms", self.timeout.as_millis()),
            };

            warn!(
                provider = %provider,
                phone = %masked,
                reason = %reason,
                "Delivery provider failed, trying next"
            );
            report.failures.push(ProviderFailure { provider, reason });
        }

        error!(
            phone = %masked,
            attempted = report.failures.len(),
            "All delivery providers failed"
        );
        report
    }
}
