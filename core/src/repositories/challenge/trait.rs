//! Challenge repository trait defining the interface for challenge persistence.

use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

use crate::domain::entities::challenge::Challenge;
use crate::errors::DomainError;

/// Result of a cooldown-guarded insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A challenge for the same subject is younger than the cooldown
    CooldownActive { wait_seconds: i64 },
}

/// Repository trait for Challenge persistence.
///
/// Every write that depends on previously read state is a single conditional
/// operation here, so two concurrent requests for one subject can never both
/// pass the same check.
#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    /// Insert `challenge` unless the newest challenge for the same subject
    /// (verified or not) was created less than `cooldown` before it.
    ///
    /// The check and the insert happen atomically.
    async fn insert_if_cooldown_elapsed(
        &self,
        challenge: &Challenge,
        cooldown: Duration,
    ) -> Result<InsertOutcome, DomainError>;

    /// Newest unverified challenge for a subject
    async fn find_latest_unverified(
        &self,
        subject_index: &str,
    ) -> Result<Option<Challenge>, DomainError>;

    /// Newest unverified challenge for a subject sent to exactly `phone`
    async fn find_latest_unverified_by_phone(
        &self,
        subject_index: &str,
        phone: &str,
    ) -> Result<Option<Challenge>, DomainError>;

    /// Persist `challenge` only if the stored copy is still unverified and
    /// still has `expected_attempts` attempts.
    ///
    /// # Returns
    /// * `Ok(true)` if the update was applied
    /// * `Ok(false)` if the record changed or disappeared in the meantime
    async fn compare_and_update(
        &self,
        challenge: &Challenge,
        expected_attempts: u32,
    ) -> Result<bool, DomainError>;

    /// Delete a challenge by id, returning whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Delete every challenge for a subject, returning how many were removed
    async fn delete_all_for_subject(&self, subject_index: &str) -> Result<usize, DomainError>;

    /// Whether any verified challenge exists for a subject
    async fn has_verified(&self, subject_index: &str) -> Result<bool, DomainError>;
}
