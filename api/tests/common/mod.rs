//! Shared fixtures for the API integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;

use pv_api::AppState;
use pv_core::services::delivery::DeliveryChannel;
use pv_infra::sms::MockSmsChannel;
use pv_infra::TrustServices;
use pv_shared::config::AppConfig;

pub const IDENTIFIER: &str = "123456789012";
pub const PHONE: &str = "9876543210";

/// App state over in-memory stores, plus the mock outbox it sends to
pub fn test_state() -> (web::Data<AppState>, Arc<MockSmsChannel>) {
    let outbox = Arc::new(MockSmsChannel::new());
    let channels: Vec<Arc<dyn DeliveryChannel>> = vec![outbox.clone()];
    let services = TrustServices::in_memory(&AppConfig::default(), channels)
        .expect("in-memory services");
    (web::Data::new(AppState::new(services)), outbox)
}

/// Pull the six-digit code out of the last message sent to `phone`
pub fn code_sent_to(outbox: &MockSmsChannel, phone: &str) -> String {
    let message = outbox.last_message_to(phone).expect("message delivered");
    message
        .body
        .split_whitespace()
        .map(|word| word.trim_end_matches('.'))
        .find(|word| word.len() == 6 && word.chars().all(|c| c.is_ascii_digit()))
        .expect("code in message body")
        .to_string()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
