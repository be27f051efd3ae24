//! Mock collaborators for OTP lifecycle tests

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::entities::audit_block::AuditBlock;
use crate::errors::{DomainResult, LedgerError};
use crate::repositories::{InMemoryChallengeRepository, InMemoryLedgerRepository};
use crate::services::credential::CredentialHasher;
use crate::services::delivery::{DeliveryChannel, DeliveryGateway};
use crate::services::ledger::{AuditLedger, AuditLedgerConfig, AuditRecorder};
use crate::services::otp::{OtpLifecycleConfig, OtpLifecycleManager};
use crate::services::token::{TokenIssuer, TokenIssuerConfig};

pub const IDENTIFIER: &str = "123456789012";
pub const PHONE: &str = "9876543210";

/// Delivery channel that records every message it is asked to send
pub struct RecordingChannel {
    name: &'static str,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingChannel {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            sent: Mutex::new(Vec::new()),
        })
    }

    /// The code in the most recent message
    pub fn last_code(&self) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let (_, message) = sent.last()?;
        message
            .split_whitespace()
            .map(|word| word.trim_end_matches('.'))
            .find(|word| word.len() == 6 && word.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string)
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    fn provider_name(&self) -> &str {
        self.name
    }

    async fn send_sms(&self, phone: &str, message: &str) -> Result<String, String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((phone.to_string(), message.to_string()));
        Ok(format!("{}-{}", self.name, sent.len()))
    }
}

/// Delivery channel that always fails
pub struct FailingChannel(pub &'static str);

#[async_trait]
impl DeliveryChannel for FailingChannel {
    fn provider_name(&self) -> &str {
        self.0
    }

    async fn send_sms(&self, _phone: &str, _message: &str) -> Result<String, String> {
        Err("provider unavailable".to_string())
    }
}

/// Recorder whose appends always lose the race
pub struct ConflictingRecorder;

#[async_trait]
impl AuditRecorder for ConflictingRecorder {
    async fn record(
        &self,
        _action: &str,
        _subject: &str,
        _metadata: JsonValue,
    ) -> DomainResult<AuditBlock> {
        Err(LedgerError::ChainConflict { attempts: 5 }.into())
    }
}

pub fn test_hasher() -> Arc<CredentialHasher> {
    Arc::new(CredentialHasher::new(&[3u8; 32], &[5u8; 32]).unwrap())
}

pub fn test_tokens() -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(TokenIssuerConfig {
        secret: "otp-test-secret".to_string(),
        ..TokenIssuerConfig::default()
    }))
}

/// Everything a test needs to drive and inspect the manager
pub struct Harness {
    pub manager: OtpLifecycleManager<InMemoryChallengeRepository>,
    pub repository: Arc<InMemoryChallengeRepository>,
    pub ledger: Arc<AuditLedger<InMemoryLedgerRepository>>,
    pub hasher: Arc<CredentialHasher>,
    pub tokens: Arc<TokenIssuer>,
}

impl Harness {
    pub fn subject_index(&self) -> String {
        self.hasher.blind_index(IDENTIFIER).unwrap()
    }
}

pub fn harness_with(
    channels: Vec<Arc<dyn DeliveryChannel>>,
    config: OtpLifecycleConfig,
) -> Harness {
    let repository = Arc::new(InMemoryChallengeRepository::new());
    let ledger = Arc::new(AuditLedger::new(
        Arc::new(InMemoryLedgerRepository::new()),
        AuditLedgerConfig::default(),
    ));
    let hasher = test_hasher();
    let tokens = test_tokens();
    let gateway = Arc::new(DeliveryGateway::new(channels, Duration::from_secs(1)));

    let manager = OtpLifecycleManager::new(
        repository.clone(),
        hasher.clone(),
        gateway,
        tokens.clone(),
        ledger.clone(),
        config,
    );

    Harness {
        manager,
        repository,
        ledger,
        hasher,
        tokens,
    }
}

pub fn harness(channel: Arc<RecordingChannel>) -> Harness {
    let channels: Vec<Arc<dyn DeliveryChannel>> = vec![channel];
    harness_with(channels, OtpLifecycleConfig::default())
}
