use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use pv_core::domain::entities::{Role, TokenScope};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyTokenRequest {
    #[validate(length(min = 1))]
    pub token: String,

    /// Scope the caller expects; checked when present
    #[serde(default)]
    pub scope: Option<TokenScope>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub subject: String,
    pub scope: TokenScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub expires_at: DateTime<Utc>,
}
