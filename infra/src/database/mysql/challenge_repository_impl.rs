//! MySQL implementation of the ChallengeRepository trait.
//!
//! Challenges live in `otp_challenges`. The cooldown-guarded insert holds a
//! MySQL advisory lock named after the subject's blind index for the span of
//! its read and write, so concurrent sends for one subject serialize while
//! different subjects proceed in parallel. Attempt updates are plain
//! conditional `UPDATE`s keyed on the expected attempt count.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlConnection, MySqlPool, Row};
use std::time::Duration as StdDuration;
use uuid::Uuid;

use pv_core::domain::entities::Challenge;
use pv_core::errors::DomainError;
use pv_core::repositories::{ChallengeRepository, InsertOutcome};

use crate::database::storage_error;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS otp_challenges (
        id CHAR(36) NOT NULL PRIMARY KEY,
        subject_index CHAR(64) NOT NULL,
        subject_ciphertext TEXT NOT NULL,
        phone VARCHAR(16) NOT NULL,
        code_hash CHAR(64) NOT NULL,
        salt VARCHAR(64) NOT NULL,
        created_at DATETIME(3) NOT NULL,
        expires_at DATETIME(3) NOT NULL,
        attempts INT UNSIGNED NOT NULL DEFAULT 0,
        verified BOOLEAN NOT NULL DEFAULT FALSE,
        success BOOLEAN NOT NULL DEFAULT FALSE,
        INDEX idx_otp_subject_created (subject_index, created_at),
        INDEX idx_otp_subject_phone (subject_index, phone)
    )
"#;

const SELECT_COLUMNS: &str = "id, subject_index, subject_ciphertext, phone, code_hash, salt, \
     created_at, expires_at, attempts, verified, success";

/// MySQL implementation of ChallengeRepository
pub struct MySqlChallengeRepository {
    pool: MySqlPool,
    lock_timeout: StdDuration,
}

impl MySqlChallengeRepository {
    pub fn new(pool: MySqlPool, lock_timeout: StdDuration) -> Self {
        Self { pool, lock_timeout }
    }

    /// Create the challenge table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to create otp_challenges table", e))?;
        Ok(())
    }

    /// Advisory lock names are capped at 64 characters by MySQL
    fn lock_name(subject_index: &str) -> String {
        let end = subject_index.len().min(48);
        format!("pv_otp:{}", &subject_index[..end])
    }

    fn row_to_challenge(row: &MySqlRow) -> Result<Challenge, DomainError> {
        let get_err = |column: &str, e: sqlx::Error| DomainError::Internal {
            message: format!("Failed to get {}: {}", column, e),
        };

        let id: String = row.try_get("id").map_err(|e| get_err("id", e))?;
        let created_at: NaiveDateTime =
            row.try_get("created_at").map_err(|e| get_err("created_at", e))?;
        let expires_at: NaiveDateTime =
            row.try_get("expires_at").map_err(|e| get_err("expires_at", e))?;

        Ok(Challenge {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid UUID: {}", e),
            })?,
            subject_index: row
                .try_get("subject_index")
                .map_err(|e| get_err("subject_index", e))?,
            subject_ciphertext: row
                .try_get("subject_ciphertext")
                .map_err(|e| get_err("subject_ciphertext", e))?,
            phone: row.try_get("phone").map_err(|e| get_err("phone", e))?,
            code_hash: row.try_get("code_hash").map_err(|e| get_err("code_hash", e))?,
            salt: row.try_get("salt").map_err(|e| get_err("salt", e))?,
            created_at: to_utc(created_at),
            expires_at: to_utc(expires_at),
            attempts: row.try_get("attempts").map_err(|e| get_err("attempts", e))?,
            verified: row.try_get("verified").map_err(|e| get_err("verified", e))?,
            success: row.try_get("success").map_err(|e| get_err("success", e))?,
        })
    }

    /// Cooldown check and insert, run while the subject lock is held
    async fn insert_locked(
        conn: &mut MySqlConnection,
        challenge: &Challenge,
        cooldown: Duration,
    ) -> Result<InsertOutcome, DomainError> {
        let query = format!(
            "SELECT {} FROM otp_challenges WHERE subject_index = ? \
             ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        );
        let newest = sqlx::query(&query)
            .bind(&challenge.subject_index)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| storage_error("Failed to read newest challenge", e))?;

        if let Some(row) = newest {
            let newest = Self::row_to_challenge(&row)?;
            if let Some(wait_seconds) = newest.cooldown_wait_seconds(cooldown, challenge.created_at)
            {
                return Ok(InsertOutcome::CooldownActive { wait_seconds });
            }
        }

        sqlx::query(
            r#"
            INSERT INTO otp_challenges (
                id, subject_index, subject_ciphertext, phone, code_hash, salt,
                created_at, expires_at, attempts, verified, success
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(challenge.id.to_string())
        .bind(&challenge.subject_index)
        .bind(&challenge.subject_ciphertext)
        .bind(&challenge.phone)
        .bind(&challenge.code_hash)
        .bind(&challenge.salt)
        .bind(challenge.created_at.naive_utc())
        .bind(challenge.expires_at.naive_utc())
        .bind(challenge.attempts)
        .bind(challenge.verified)
        .bind(challenge.success)
        .execute(&mut *conn)
        .await
        .map_err(|e| storage_error("Failed to insert challenge", e))?;

        Ok(InsertOutcome::Inserted)
    }
}

fn to_utc(value: NaiveDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(value, Utc)
}

#[async_trait]
impl ChallengeRepository for MySqlChallengeRepository {
    async fn insert_if_cooldown_elapsed(
        &self,
        challenge: &Challenge,
        cooldown: Duration,
    ) -> Result<InsertOutcome, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| storage_error("Failed to acquire connection", e))?;

        let lock_name = Self::lock_name(&challenge.subject_index);
        let acquired: Option<i64> = sqlx::query_scalar("SELECT GET_LOCK(?, ?)")
            .bind(&lock_name)
            .bind(self.lock_timeout.as_secs() as i64)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| storage_error("Failed to acquire subject lock", e))?;

        if acquired != Some(1) {
            tracing::warn!(lock = %lock_name, "Timed out waiting for subject lock");
            return Err(DomainError::storage("timed out waiting for subject lock"));
        }

        let outcome = Self::insert_locked(&mut conn, challenge, cooldown).await;

        if let Err(e) = sqlx::query("SELECT RELEASE_LOCK(?)")
            .bind(&lock_name)
            .execute(&mut *conn)
            .await
        {
            // The lock dies with the session; close it rather than return it to the pool.
            tracing::error!(error = %e, lock = %lock_name, "Failed to release subject lock");
            let _ = conn.detach();
        }

        outcome
    }

    async fn find_latest_unverified(
        &self,
        subject_index: &str,
    ) -> Result<Option<Challenge>, DomainError> {
        let query = format!(
            "SELECT {} FROM otp_challenges WHERE subject_index = ? AND verified = FALSE \
             ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        );
        sqlx::query(&query)
            .bind(subject_index)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to find challenge", e))?
            .as_ref()
            .map(Self::row_to_challenge)
            .transpose()
    }

    async fn find_latest_unverified_by_phone(
        &self,
        subject_index: &str,
        phone: &str,
    ) -> Result<Option<Challenge>, DomainError> {
        let query = format!(
            "SELECT {} FROM otp_challenges \
             WHERE subject_index = ? AND phone = ? AND verified = FALSE \
             ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        );
        sqlx::query(&query)
            .bind(subject_index)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to find challenge by phone", e))?
            .as_ref()
            .map(Self::row_to_challenge)
            .transpose()
    }

    async fn compare_and_update(
        &self,
        challenge: &Challenge,
        expected_attempts: u32,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE otp_challenges
            SET attempts = ?, verified = ?, success = ?, expires_at = ?
            WHERE id = ? AND attempts = ? AND verified = FALSE
            "#,
        )
        .bind(challenge.attempts)
        .bind(challenge.verified)
        .bind(challenge.success)
        .bind(challenge.expires_at.naive_utc())
        .bind(challenge.id.to_string())
        .bind(expected_attempts)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to update challenge", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM otp_challenges WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete challenge", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_subject(&self, subject_index: &str) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM otp_challenges WHERE subject_index = ?")
            .bind(subject_index)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to clear challenges", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn has_verified(&self, subject_index: &str) -> Result<bool, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM otp_challenges WHERE subject_index = ? AND verified = TRUE",
        )
        .bind(subject_index)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to check verification", e))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_name_fits_mysql_limit() {
        let index = "a".repeat(64);
        let name = MySqlChallengeRepository::lock_name(&index);
        assert!(name.len() <= 64);
        assert!(name.starts_with("pv_otp:"));
    }

    #[test]
    fn test_lock_name_is_stable_per_subject() {
        let a = MySqlChallengeRepository::lock_name(&"ab".repeat(32));
        let b = MySqlChallengeRepository::lock_name(&"ab".repeat(32));
        let c = MySqlChallengeRepository::lock_name(&"cd".repeat(32));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
