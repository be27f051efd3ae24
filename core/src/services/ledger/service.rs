//! Audit ledger service.
//!
//! Appends are optimistic: read the tail, build the next block, and store it
//! only if the tail has not moved. A lost race rebuilds on the new tail, so
//! concurrent writers serialise into one linear chain instead of forking it.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::entities::audit_block::{AuditBlock, GENESIS_HASH};
use crate::errors::{DomainResult, LedgerError, ValidationError};
use crate::repositories::{AppendOutcome, LedgerRepository};

use super::config::AuditLedgerConfig;
use super::recorder::AuditRecorder;
use super::types::ChainVerification;

/// Service for appending to and auditing the hash chain
pub struct AuditLedger<R>
where
    R: LedgerRepository + ?Sized,
{
    repository: Arc<R>,
    config: AuditLedgerConfig,
}

impl<R> AuditLedger<R>
where
    R: LedgerRepository + ?Sized + 'static,
{
    pub fn new(repository: Arc<R>, config: AuditLedgerConfig) -> Self {
        Self { repository, config }
    }

    /// Append an event to the chain.
    ///
    /// # Errors
    /// * `ValidationError::RequiredField` for a blank action or subject
    /// * `LedgerError::ChainConflict` when the tail kept moving for every attempt
    pub async fn append(
        &self,
        action: &str,
        subject: &str,
        metadata: JsonValue,
    ) -> DomainResult<AuditBlock> {
        if action.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "action".to_string(),
            }
            .into());
        }
        if subject.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "subject".to_string(),
            }
            .into());
        }

        for attempt in 1..=self.config.max_retries {
            let tail = self.repository.tail().await?;
            let (sequence, prev_hash, floor_ms) = match &tail {
                Some(tail) => (tail.sequence + 1, tail.hash.clone(), tail.timestamp_ms),
                None => (1, GENESIS_HASH.to_string(), i64::MIN),
            };
            // Keep timestamps non-decreasing along the chain
            let timestamp_ms = Utc::now().timestamp_millis().max(floor_ms);

            let block = AuditBlock::new(
                sequence,
                action,
                subject,
                metadata.clone(),
                prev_hash,
                timestamp_ms,
            );

            match self.repository.append_if_tail(&block).await? {
                AppendOutcome::Appended => {
                    info!(
                        sequence = block.sequence,
                        action = %block.action,
                        hash = %block.hash,
                        "Audit block appended"
                    );
                    return Ok(block);
                }
                AppendOutcome::Conflict => {
                    debug!(attempt, sequence, "Ledger tail moved, rebuilding block");
                    if attempt < self.config.max_retries {
                        tokio::time::sleep(self.config.retry_backoff * attempt).await;
                    }
                }
            }
        }

        warn!(
            action = %action,
            attempts = self.config.max_retries,
            "Audit append abandoned after repeated chain conflicts"
        );
        Err(LedgerError::ChainConflict {
            attempts: self.config.max_retries,
        }
        .into())
    }

    /// Every block in creation order
    pub async fn list(&self) -> DomainResult<Vec<AuditBlock>> {
        self.repository.list_all().await
    }

    /// Blocks concerning one subject, in creation order
    pub async fn trail_for(&self, subject: &str) -> DomainResult<Vec<AuditBlock>> {
        self.repository.list_by_subject(subject).await
    }

    /// Recompute every hash and report the first inconsistency
    pub async fn verify_chain(&self) -> DomainResult<ChainVerification> {
        let blocks = self.repository.list_all().await?;
        let verification = Self::verify_blocks(&blocks);

        match &verification {
            ChainVerification::Intact { length } => {
                info!(length, "Audit chain verified");
            }
            ChainVerification::Broken {
                index, sequence, ..
            } => {
                error!(index, sequence, "Audit chain integrity failure");
            }
        }

        Ok(verification)
    }

    /// Walk `blocks` in order, recomputing each hash from the previous
    /// block's stored hash.
    pub fn verify_blocks(blocks: &[AuditBlock]) -> ChainVerification {
        let mut prev_hash = GENESIS_HASH;

        for (index, block) in blocks.iter().enumerate() {
            let expected_hash = block.hash_after(prev_hash);
            if block.prev_hash != prev_hash || block.hash != expected_hash {
                return ChainVerification::Broken {
                    index,
                    sequence: block.sequence,
                    expected_hash,
                    stored_hash: block.hash.clone(),
                };
            }
            prev_hash = &block.hash;
        }

        ChainVerification::Intact {
            length: blocks.len(),
        }
    }
}

#[async_trait]
impl<R> AuditRecorder for AuditLedger<R>
where
    R: LedgerRepository + ?Sized + 'static,
{
    async fn record(
        &self,
        action: &str,
        subject: &str,
        metadata: JsonValue,
    ) -> DomainResult<AuditBlock> {
        self.append(action, subject, metadata).await
    }
}
