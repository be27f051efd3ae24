//! Unit tests for the audit ledger

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::audit_block::{actions, AuditBlock, GENESIS_HASH};
use crate::errors::{DomainError, LedgerError, ValidationError};
use crate::repositories::{AppendOutcome, InMemoryLedgerRepository, LedgerRepository};
use crate::services::ledger::{AuditLedger, AuditLedgerConfig, AuditRecorder, ChainVerification};

/// Reports a conflict for the first `conflicts` appends
struct ContendedLedgerRepository {
    inner: InMemoryLedgerRepository,
    conflicts: AtomicU32,
}

impl ContendedLedgerRepository {
    fn new(conflicts: u32) -> Self {
        Self {
            inner: InMemoryLedgerRepository::new(),
            conflicts: AtomicU32::new(conflicts),
        }
    }
}

#[async_trait]
impl LedgerRepository for ContendedLedgerRepository {
    async fn tail(&self) -> Result<Option<AuditBlock>, DomainError> {
        self.inner.tail().await
    }

    async fn append_if_tail(&self, block: &AuditBlock) -> Result<AppendOutcome, DomainError> {
        let remaining = self.conflicts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.conflicts.store(remaining - 1, Ordering::SeqCst);
            return Ok(AppendOutcome::Conflict);
        }
        self.inner.append_if_tail(block).await
    }

    async fn list_all(&self) -> Result<Vec<AuditBlock>, DomainError> {
        self.inner.list_all().await
    }

    async fn list_by_subject(&self, subject: &str) -> Result<Vec<AuditBlock>, DomainError> {
        self.inner.list_by_subject(subject).await
    }
}

fn config(max_retries: u32) -> AuditLedgerConfig {
    AuditLedgerConfig {
        max_retries,
        retry_backoff: Duration::from_millis(1),
    }
}

fn ledger() -> AuditLedger<InMemoryLedgerRepository> {
    AuditLedger::new(Arc::new(InMemoryLedgerRepository::new()), config(5))
}

#[tokio::test]
async fn test_first_block_links_to_genesis() {
    let ledger = ledger();
    let block = ledger
        .append(actions::UPDATE_STATUS, "issue-1", json!({"status": "open"}))
        .await
        .unwrap();

    assert_eq!(block.sequence, 1);
    assert_eq!(block.prev_hash, GENESIS_HASH);
    assert_eq!(block.hash, block.hash_after(GENESIS_HASH));
}

#[tokio::test]
async fn test_blocks_link_in_order() {
    let ledger = ledger();
    let first = ledger.append(actions::UPDATE_STATUS, "issue-1", json!({})).await.unwrap();
    let second = ledger.append(actions::UPLOAD_IMAGES, "issue-1", json!({"count": 3})).await.unwrap();
    let third = ledger.append(actions::UPDATE_STATUS, "issue-2", json!({})).await.unwrap();

    assert_eq!(second.prev_hash, first.hash);
    assert_eq!(third.prev_hash, second.hash);
    assert_eq!(third.sequence, 3);
    assert!(second.timestamp_ms >= first.timestamp_ms);

    let listed = ledger.list().await.unwrap();
    assert_eq!(listed, vec![first.clone(), second.clone(), third]);

    let trail = ledger.trail_for("issue-1").await.unwrap();
    assert_eq!(trail, vec![first, second]);
}

#[tokio::test]
async fn test_blank_action_or_subject_rejected() {
    let ledger = ledger();

    let err = ledger.append("  ", "issue-1", json!({})).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::RequiredField { ref field }) if field == "action"
    ));

    let err = ledger.append("UpdateStatus", "", json!({})).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::RequiredField { ref field }) if field == "subject"
    ));
    assert!(ledger.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_append_retries_after_conflict() {
    let ledger = AuditLedger::new(Arc::new(ContendedLedgerRepository::new(2)), config(5));

    let block = ledger.append(actions::UPDATE_STATUS, "issue-1", json!({})).await.unwrap();
    assert_eq!(block.sequence, 1);
    assert_eq!(ledger.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_append_surfaces_chain_conflict() {
    let ledger = AuditLedger::new(Arc::new(ContendedLedgerRepository::new(10)), config(3));

    let err = ledger.append(actions::UPDATE_STATUS, "issue-1", json!({})).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Ledger(LedgerError::ChainConflict { attempts: 3 })
    ));
    assert!(err.is_retryable());
    assert!(ledger.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_verify_intact_chain() {
    let ledger = ledger();
    assert_eq!(
        ledger.verify_chain().await.unwrap(),
        ChainVerification::Intact { length: 0 }
    );

    for i in 0..4 {
        ledger
            .append(actions::UPDATE_STATUS, &format!("issue-{}", i), json!({"i": i}))
            .await
            .unwrap();
    }
    assert_eq!(
        ledger.verify_chain().await.unwrap(),
        ChainVerification::Intact { length: 4 }
    );
}

#[tokio::test]
async fn test_verify_detects_edited_metadata() {
    let source = ledger();
    for i in 0..3 {
        source
            .append(actions::UPDATE_STATUS, "issue-1", json!({"step": i}))
            .await
            .unwrap();
    }
    let mut blocks = source.list().await.unwrap();
    blocks[1].metadata = json!({"step": 99});

    let tampered = AuditLedger::new(
        Arc::new(InMemoryLedgerRepository::with_blocks(blocks.clone())),
        config(5),
    );
    match tampered.verify_chain().await.unwrap() {
        ChainVerification::Broken {
            index,
            sequence,
            expected_hash,
            stored_hash,
        } => {
            assert_eq!(index, 1);
            assert_eq!(sequence, 2);
            assert_eq!(stored_hash, blocks[1].hash);
            assert_ne!(expected_hash, stored_hash);
        }
        other => panic!("expected broken chain, got {:?}", other),
    }
}

#[tokio::test]
async fn test_verify_detects_rehashed_block() {
    let source = ledger();
    for i in 0..3 {
        source
            .append(actions::UPDATE_STATUS, "issue-1", json!({"step": i}))
            .await
            .unwrap();
    }
    let mut blocks = source.list().await.unwrap();

    // Rewriting a block and its own hash still breaks the next link
    blocks[0].metadata = json!({"step": 42});
    blocks[0].hash = blocks[0].hash_after(GENESIS_HASH);

    let verification = AuditLedger::<InMemoryLedgerRepository>::verify_blocks(&blocks);
    assert!(matches!(
        verification,
        ChainVerification::Broken { index: 1, .. }
    ));
}

#[tokio::test]
async fn test_verify_detects_reordering() {
    let source = ledger();
    for i in 0..3 {
        source
            .append(actions::UPDATE_STATUS, "issue-1", json!({"step": i}))
            .await
            .unwrap();
    }
    let mut blocks = source.list().await.unwrap();
    blocks.swap(1, 2);

    let verification = AuditLedger::<InMemoryLedgerRepository>::verify_blocks(&blocks);
    assert!(matches!(
        verification,
        ChainVerification::Broken { index: 1, .. }
    ));
}

#[tokio::test]
async fn test_recorder_trait_appends() {
    let ledger = Arc::new(ledger());
    let recorder: Arc<dyn AuditRecorder> = ledger.clone();

    let block = recorder
        .record(actions::OTP_DELIVERY, "subject-index", json!({"delivered": true}))
        .await
        .unwrap();

    assert_eq!(block.action, "OtpDelivery");
    assert_eq!(ledger.list().await.unwrap().len(), 1);
}
