//! Ledger repository trait defining the interface for audit block persistence.

use async_trait::async_trait;

use crate::domain::entities::audit_block::AuditBlock;
use crate::errors::DomainError;

/// Result of a conditional append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    /// The tail moved since the block was built; rebuild and retry
    Conflict,
}

/// Repository trait for the append-only audit chain.
///
/// Implementations never update or delete stored blocks.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Block with the highest sequence, if any
    async fn tail(&self) -> Result<Option<AuditBlock>, DomainError>;

    /// Store `block` only if the current tail's hash equals `block.prev_hash`
    /// (or the chain is empty and `block.prev_hash` is the genesis marker)
    /// and `block.sequence` directly follows the tail.
    async fn append_if_tail(&self, block: &AuditBlock) -> Result<AppendOutcome, DomainError>;

    /// Every block in creation order
    async fn list_all(&self) -> Result<Vec<AuditBlock>, DomainError>;

    /// Blocks for one subject in creation order
    async fn list_by_subject(&self, subject: &str) -> Result<Vec<AuditBlock>, DomainError>;
}
