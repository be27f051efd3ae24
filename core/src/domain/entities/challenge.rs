//! OTP challenge entity.
//!
//! A challenge never holds the plaintext code or the raw subject identifier:
//! the code is stored as a salted digest and the identifier both as a keyed
//! blind index (for lookups) and as ciphertext (for recovery).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// A pending one-time passcode challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Unique identifier for the challenge
    pub id: Uuid,

    /// HMAC blind index of the subject identifier
    pub subject_index: String,

    /// AES-GCM ciphertext of the subject identifier
    pub subject_ciphertext: String,

    /// Ten-digit subscriber number the code was sent to
    pub phone: String,

    /// Hex SHA-256 digest of code and salt
    pub code_hash: String,

    /// Per-challenge random salt (hex)
    pub salt: String,

    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,

    /// Failed verification attempts so far
    pub attempts: u32,

    pub verified: bool,
    pub success: bool,
}

impl Challenge {
    /// Creates a fresh challenge that expires `ttl` from now
    pub fn new(
        subject_index: String,
        subject_ciphertext: String,
        phone: String,
        code_hash: String,
        salt: String,
        ttl: Duration,
    ) -> Self {
        Self::new_at(
            subject_index,
            subject_ciphertext,
            phone,
            code_hash,
            salt,
            ttl,
            Utc::now(),
        )
    }

    /// Creates a challenge with an explicit creation instant
    pub fn new_at(
        subject_index: String,
        subject_ciphertext: String,
        phone: String,
        code_hash: String,
        salt: String,
        ttl: Duration,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_index,
            subject_ciphertext,
            phone,
            code_hash,
            salt,
            created_at,
            expires_at: created_at + ttl,
            attempts: 0,
            verified: false,
            success: false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }

    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempts)
    }

    /// Whole seconds (rounded up) until another challenge may be created
    /// for the same subject, or `None` once the cooldown has elapsed.
    pub fn cooldown_wait_seconds(&self, cooldown: Duration, now: DateTime<Utc>) -> Option<i64> {
        let remaining = (self.created_at + cooldown) - now;
        let millis = remaining.num_milliseconds();
        if millis <= 0 {
            None
        } else {
            Some((millis + 999) / 1000)
        }
    }

    pub fn record_failed_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    pub fn mark_verified(&mut self) {
        self.verified = true;
        self.success = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge_at(created_at: DateTime<Utc>) -> Challenge {
        Challenge::new_at(
            "index".to_string(),
            "cipher".to_string(),
            "9876543210".to_string(),
            "hash".to_string(),
            "salt".to_string(),
            Duration::minutes(10),
            created_at,
        )
    }

    #[test]
    fn test_new_challenge() {
        let now = Utc::now();
        let challenge = challenge_at(now);

        assert_eq!(challenge.attempts, 0);
        assert!(!challenge.verified);
        assert!(!challenge.success);
        assert_eq!(challenge.expires_at - challenge.created_at, Duration::minutes(10));
        assert!(!challenge.is_expired_at(now));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let challenge = challenge_at(now);

        assert!(!challenge.is_expired_at(challenge.expires_at));
        assert!(challenge.is_expired_at(challenge.expires_at + Duration::milliseconds(1)));
        assert!(challenge.is_expired_at(now + Duration::minutes(11)));
    }

    #[test]
    fn test_failed_attempts() {
        let mut challenge = challenge_at(Utc::now());
        for _ in 0..4 {
            challenge.record_failed_attempt();
        }
        assert_eq!(challenge.remaining_attempts(5), 1);
        assert!(!challenge.is_exhausted(5));

        challenge.record_failed_attempt();
        assert_eq!(challenge.remaining_attempts(5), 0);
        assert!(challenge.is_exhausted(5));
    }

    #[test]
    fn test_cooldown_wait_rounds_up() {
        let now = Utc::now();
        let challenge = challenge_at(now);
        let cooldown = Duration::seconds(30);

        assert_eq!(challenge.cooldown_wait_seconds(cooldown, now), Some(30));
        assert_eq!(
            challenge.cooldown_wait_seconds(cooldown, now + Duration::milliseconds(10_500)),
            Some(20)
        );
        assert_eq!(
            challenge.cooldown_wait_seconds(cooldown, now + Duration::seconds(30)),
            None
        );
    }

    #[test]
    fn test_mark_verified() {
        let mut challenge = challenge_at(Utc::now());
        challenge.mark_verified();
        assert!(challenge.verified);
        assert!(challenge.success);
    }
}
