//! Mock SMS channel for development and tests.
//!
//! Messages are kept in memory instead of being sent. Logs carry only the
//! masked phone and the message length, never the body.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use pv_core::services::delivery::DeliveryChannel;
use pv_shared::utils::phone::mask_phone_number;

/// One captured message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: String,
    pub phone: String,
    pub body: String,
}

#[derive(Default)]
pub struct MockSmsChannel {
    sent: Mutex<Vec<SentMessage>>,
}

impl MockSmsChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, oldest first
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Most recent message to `phone`
    pub fn last_message_to(&self, phone: &str) -> Option<SentMessage> {
        self.sent
            .lock()
            .ok()?
            .iter()
            .rev()
            .find(|m| m.phone == phone)
            .cloned()
    }
}

#[async_trait]
impl DeliveryChannel for MockSmsChannel {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn send_sms(&self, phone: &str, message: &str) -> Result<String, String> {
        let message_id = format!("mock-{}", Uuid::new_v4());

        info!(
            phone = %mask_phone_number(phone),
            length = message.len(),
            message_id = %message_id,
            "Mock SMS captured"
        );

        self.sent
            .lock()
            .map_err(|_| "mock outbox poisoned".to_string())?
            .push(SentMessage {
                message_id: message_id.clone(),
                phone: phone.to_string(),
                body: message.to_string(),
            });

        Ok(message_id)
    }
}
