//! MySQL implementation of the LedgerRepository trait.
//!
//! Blocks live in `audit_blocks`. The primary key on `sequence` and the
//! unique key on `prev_hash` make a fork impossible at the storage level:
//! two writers that built on the same tail collide on both, and the loser
//! sees `AppendOutcome::Conflict`.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

use pv_core::domain::entities::{AuditBlock, GENESIS_HASH};
use pv_core::errors::DomainError;
use pv_core::repositories::{AppendOutcome, LedgerRepository};

use crate::database::{is_unique_violation, storage_error};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS audit_blocks (
        sequence BIGINT UNSIGNED NOT NULL PRIMARY KEY,
        timestamp_ms BIGINT NOT NULL,
        action VARCHAR(64) NOT NULL,
        subject VARCHAR(128) NOT NULL,
        metadata LONGTEXT NOT NULL,
        prev_hash VARCHAR(64) NOT NULL,
        hash CHAR(64) NOT NULL,
        UNIQUE KEY uq_audit_prev_hash (prev_hash),
        UNIQUE KEY uq_audit_hash (hash),
        INDEX idx_audit_subject (subject, sequence)
    )
"#;

const SELECT_COLUMNS: &str =
    "sequence, timestamp_ms, action, subject, metadata, prev_hash, hash";

/// MySQL implementation of LedgerRepository
pub struct MySqlLedgerRepository {
    pool: MySqlPool,
}

impl MySqlLedgerRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create the block table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to create audit_blocks table", e))?;
        Ok(())
    }

    /// Stored hashes are loaded as-is, never recomputed, so tampering with
    /// any column shows up in chain verification.
    fn row_to_block(row: &MySqlRow) -> Result<AuditBlock, DomainError> {
        let get_err = |column: &str, e: sqlx::Error| DomainError::Internal {
            message: format!("Failed to get {}: {}", column, e),
        };

        let metadata: String = row.try_get("metadata").map_err(|e| get_err("metadata", e))?;
        let metadata: JsonValue =
            serde_json::from_str(&metadata).map_err(|e| DomainError::Internal {
                message: format!("Invalid block metadata: {}", e),
            })?;

        Ok(AuditBlock {
            sequence: row.try_get("sequence").map_err(|e| get_err("sequence", e))?,
            timestamp_ms: row
                .try_get("timestamp_ms")
                .map_err(|e| get_err("timestamp_ms", e))?,
            action: row.try_get("action").map_err(|e| get_err("action", e))?,
            subject: row.try_get("subject").map_err(|e| get_err("subject", e))?,
            metadata,
            prev_hash: row.try_get("prev_hash").map_err(|e| get_err("prev_hash", e))?,
            hash: row.try_get("hash").map_err(|e| get_err("hash", e))?,
        })
    }
}

#[async_trait]
impl LedgerRepository for MySqlLedgerRepository {
    async fn tail(&self) -> Result<Option<AuditBlock>, DomainError> {
        let query = format!(
            "SELECT {} FROM audit_blocks ORDER BY sequence DESC LIMIT 1",
            SELECT_COLUMNS
        );
        sqlx::query(&query)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to read ledger tail", e))?
            .as_ref()
            .map(Self::row_to_block)
            .transpose()
    }

    async fn append_if_tail(&self, block: &AuditBlock) -> Result<AppendOutcome, DomainError> {
        // Insert only while the stored tail still matches the block's link.
        let result = sqlx::query(
            r#"
            INSERT INTO audit_blocks (
                sequence, timestamp_ms, action, subject, metadata, prev_hash, hash
            )
            SELECT ?, ?, ?, ?, ?, ?, ? FROM DUAL
            WHERE COALESCE(
                (SELECT t.hash FROM audit_blocks t ORDER BY t.sequence DESC LIMIT 1),
                ?
            ) = ?
            AND COALESCE(
                (SELECT MAX(s.sequence) FROM audit_blocks s),
                0
            ) + 1 = ?
            "#,
        )
        .bind(block.sequence)
        .bind(block.timestamp_ms)
        .bind(&block.action)
        .bind(&block.subject)
        .bind(block.metadata.to_string())
        .bind(&block.prev_hash)
        .bind(&block.hash)
        .bind(GENESIS_HASH)
        .bind(&block.prev_hash)
        .bind(block.sequence)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 1 => Ok(AppendOutcome::Appended),
            Ok(_) => Ok(AppendOutcome::Conflict),
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!(sequence = block.sequence, "Ledger append lost the race");
                Ok(AppendOutcome::Conflict)
            }
            Err(e) => Err(storage_error("Failed to append audit block", e)),
        }
    }

    async fn list_all(&self) -> Result<Vec<AuditBlock>, DomainError> {
        let query = format!(
            "SELECT {} FROM audit_blocks ORDER BY sequence ASC",
            SELECT_COLUMNS
        );
        sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to list audit blocks", e))?
            .iter()
            .map(Self::row_to_block)
            .collect()
    }

    async fn list_by_subject(&self, subject: &str) -> Result<Vec<AuditBlock>, DomainError> {
        let query = format!(
            "SELECT {} FROM audit_blocks WHERE subject = ? ORDER BY sequence ASC",
            SELECT_COLUMNS
        );
        sqlx::query(&query)
            .bind(subject)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to list audit trail", e))?
            .iter()
            .map(Self::row_to_block)
            .collect()
    }
}
