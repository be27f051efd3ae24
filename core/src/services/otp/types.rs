//! Types for OTP lifecycle results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of issuing a challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendChallengeResult {
    /// The challenge was stored; the code may still have failed to arrive
    pub accepted: bool,
    pub challenge_id: Uuid,
    pub expires_at: DateTime<Utc>,
    /// When the subject may request another code
    pub next_resend_at: DateTime<Utc>,
    /// Provider that accepted the message
    pub delivery_provider: Option<String>,
    /// Set when no provider accepted the message
    pub warning: Option<String>,
}

/// Result of a successful verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyChallengeResult {
    pub challenge_id: Uuid,
    /// Blind index of the verified subject, also the token subject
    pub subject_index: String,
    pub phone: String,
    /// `otp-verified-pending-password` token
    pub scoped_token: String,
    pub token_expires_at: DateTime<Utc>,
}
