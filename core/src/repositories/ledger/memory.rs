//! In-process ledger store guarded by a single mutex.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::audit_block::{AuditBlock, GENESIS_HASH};
use crate::errors::DomainError;

use super::{AppendOutcome, LedgerRepository};

#[derive(Default)]
pub struct InMemoryLedgerRepository {
    blocks: Mutex<Vec<AuditBlock>>,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with pre-built blocks, bypassing the tail check
    pub fn with_blocks(blocks: Vec<AuditBlock>) -> Self {
        Self {
            blocks: Mutex::new(blocks),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<AuditBlock>>, DomainError> {
        self.blocks
            .lock()
            .map_err(|_| DomainError::storage("ledger store lock poisoned"))
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn tail(&self) -> Result<Option<AuditBlock>, DomainError> {
        Ok(self.lock()?.last().cloned())
    }

    async fn append_if_tail(&self, block: &AuditBlock) -> Result<AppendOutcome, DomainError> {
        let mut blocks = self.lock()?;

        let (tail_hash, next_sequence) = match blocks.last() {
            Some(tail) => (tail.hash.as_str(), tail.sequence + 1),
            None => (GENESIS_HASH, 1),
        };
        if block.prev_hash != tail_hash || block.sequence != next_sequence {
            return Ok(AppendOutcome::Conflict);
        }

        blocks.push(block.clone());
        Ok(AppendOutcome::Appended)
    }

    async fn list_all(&self) -> Result<Vec<AuditBlock>, DomainError> {
        Ok(self.lock()?.clone())
    }

    async fn list_by_subject(&self, subject: &str) -> Result<Vec<AuditBlock>, DomainError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|b| b.subject == subject)
            .cloned()
            .collect())
    }
}
