use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::domain::entities::audit_block::AuditBlock;
use crate::errors::DomainResult;

/// Anything that can durably record an audit event.
///
/// Lets other services write to the ledger without knowing its storage.
#[async_trait]
pub trait AuditRecorder: Send + Sync {
    async fn record(
        &self,
        action: &str,
        subject: &str,
        metadata: JsonValue,
    ) -> DomainResult<AuditBlock>;
}
