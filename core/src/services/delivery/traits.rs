//! Trait for SMS provider integration

use async_trait::async_trait;

/// One outbound SMS provider
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Short stable name used in logs and audit metadata
    fn provider_name(&self) -> &str;

    /// Send `message` to a ten-digit subscriber number.
    ///
    /// Returns the provider's message id, or a failure description.
    async fn send_sms(&self, phone: &str, message: &str) -> Result<String, String>;
}
