//! In-process challenge store.
//!
//! A single mutex guards the whole collection, which makes each trait method
//! one atomic step. Used when no database is configured and in tests.

use async_trait::async_trait;
use chrono::Duration;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::entities::challenge::Challenge;
use crate::errors::DomainError;

use super::{ChallengeRepository, InsertOutcome};

pub struct InMemoryChallengeRepository {
    challenges: Mutex<Vec<Challenge>>,
    should_fail: AtomicBool,
}

impl InMemoryChallengeRepository {
    pub fn new() -> Self {
        Self {
            challenges: Mutex::new(Vec::new()),
            should_fail: AtomicBool::new(false),
        }
    }

    /// Make every subsequent operation fail with a storage error
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Number of stored challenges, verified or not
    pub fn len(&self) -> usize {
        self.challenges.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Challenge>>, DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::storage("challenge store unavailable"));
        }
        self.challenges
            .lock()
            .map_err(|_| DomainError::storage("challenge store lock poisoned"))
    }

    fn latest<'a, F>(challenges: &'a [Challenge], predicate: F) -> Option<&'a Challenge>
    where
        F: Fn(&Challenge) -> bool,
    {
        challenges
            .iter()
            .filter(|c| predicate(c))
            .max_by_key(|c| c.created_at)
    }
}

impl Default for InMemoryChallengeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChallengeRepository for InMemoryChallengeRepository {
    async fn insert_if_cooldown_elapsed(
        &self,
        challenge: &Challenge,
        cooldown: Duration,
    ) -> Result<InsertOutcome, DomainError> {
        let mut challenges = self.lock()?;

        let newest = Self::latest(&challenges, |c| c.subject_index == challenge.subject_index);
        if let Some(wait_seconds) =
            newest.and_then(|c| c.cooldown_wait_seconds(cooldown, challenge.created_at))
        {
            return Ok(InsertOutcome::CooldownActive { wait_seconds });
        }

        challenges.push(challenge.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn find_latest_unverified(
        &self,
        subject_index: &str,
    ) -> Result<Option<Challenge>, DomainError> {
        let challenges = self.lock()?;
        Ok(Self::latest(&challenges, |c| {
            c.subject_index == subject_index && !c.verified
        })
        .cloned())
    }

    async fn find_latest_unverified_by_phone(
        &self,
        subject_index: &str,
        phone: &str,
    ) -> Result<Option<Challenge>, DomainError> {
        let challenges = self.lock()?;
        Ok(Self::latest(&challenges, |c| {
            c.subject_index == subject_index && c.phone == phone && !c.verified
        })
        .cloned())
    }

    async fn compare_and_update(
        &self,
        challenge: &Challenge,
        expected_attempts: u32,
    ) -> Result<bool, DomainError> {
        let mut challenges = self.lock()?;
        match challenges.iter_mut().find(|c| c.id == challenge.id) {
            Some(stored) if !stored.verified && stored.attempts == expected_attempts => {
                *stored = challenge.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut challenges = self.lock()?;
        let before = challenges.len();
        challenges.retain(|c| c.id != id);
        Ok(challenges.len() != before)
    }

    async fn delete_all_for_subject(&self, subject_index: &str) -> Result<usize, DomainError> {
        let mut challenges = self.lock()?;
        let before = challenges.len();
        challenges.retain(|c| c.subject_index != subject_index);
        Ok(before - challenges.len())
    }

    async fn has_verified(&self, subject_index: &str) -> Result<bool, DomainError> {
        let challenges = self.lock()?;
        Ok(challenges
            .iter()
            .any(|c| c.subject_index == subject_index && c.verified))
    }
}
