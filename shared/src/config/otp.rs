//! One-time passcode lifecycle configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Limits governing challenge issuance and verification
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Seconds a challenge stays verifiable after creation
    pub code_ttl_seconds: i64,

    /// Minimum seconds between two challenges for the same subject
    pub resend_cooldown_seconds: i64,

    /// Failed verifications allowed before a challenge is discarded
    pub max_attempts: u32,

    /// Upper bound for a single delivery provider call, in seconds
    pub delivery_timeout_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: 600,      // 10 minutes
            resend_cooldown_seconds: 30,
            max_attempts: 5,
            delivery_timeout_seconds: 10,
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_ttl_seconds: env_or("OTP_CODE_TTL_SECONDS", defaults.code_ttl_seconds),
            resend_cooldown_seconds: env_or(
                "OTP_RESEND_COOLDOWN_SECONDS",
                defaults.resend_cooldown_seconds,
            ),
            max_attempts: env_or("OTP_MAX_ATTEMPTS", defaults.max_attempts),
            delivery_timeout_seconds: env_or(
                "OTP_DELIVERY_TIMEOUT_SECONDS",
                defaults.delivery_timeout_seconds,
            ),
        }
    }

    /// Code lifetime in whole minutes, rounded up (used in message text)
    pub fn code_ttl_minutes(&self) -> i64 {
        (self.code_ttl_seconds + 59) / 60
    }
}
