use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use pv_core::domain::entities::TokenScope;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendChallengeRequest {
    /// 12-digit national identifier; spaces are tolerated
    #[validate(length(min = 12, max = 14))]
    pub identifier: String,

    /// Ten-digit subscriber number; separators are tolerated
    #[validate(length(min = 10, max = 16))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendChallengeResponse {
    pub accepted: bool,
    pub challenge_id: Uuid,
    pub expires_at: DateTime<Utc>,
    /// Seconds until another code may be requested
    pub resend_after: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyChallengeRequest {
    #[validate(length(min = 12, max = 14))]
    pub identifier: String,

    /// 6-digit verification code
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyAssertionRequest {
    #[validate(length(min = 12, max = 14))]
    pub identifier: String,

    /// Phone the external attestation vouches for, with or without country code
    #[validate(length(min = 10, max = 16))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyChallengeResponse {
    pub verified: bool,
    pub challenge_id: Uuid,
    pub scope: TokenScope,
    pub scoped_token: String,
    pub token_expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IdentifierRequest {
    #[validate(length(min = 12, max = 14))]
    pub identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationStatusResponse {
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearChallengesResponse {
    pub removed: usize,
}
