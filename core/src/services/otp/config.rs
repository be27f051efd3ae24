//! Configuration for the OTP lifecycle manager

use chrono::Duration;
use pv_shared::config::OtpConfig;

#[derive(Debug, Clone)]
pub struct OtpLifecycleConfig {
    /// How long a code stays verifiable
    pub code_ttl: Duration,
    /// Minimum spacing between challenges for one subject
    pub resend_cooldown: Duration,
    /// Failed verifications allowed per challenge
    pub max_attempts: u32,
}

impl Default for OtpLifecycleConfig {
    fn default() -> Self {
        Self::from(&OtpConfig::default())
    }
}

impl From<&OtpConfig> for OtpLifecycleConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            code_ttl: Duration::seconds(config.code_ttl_seconds),
            resend_cooldown: Duration::seconds(config.resend_cooldown_seconds),
            max_attempts: config.max_attempts.max(1),
        }
    }
}

impl OtpLifecycleConfig {
    /// Code lifetime in whole minutes, rounded up, for message text
    pub fn code_ttl_minutes(&self) -> i64 {
        (self.code_ttl.num_seconds() + 59) / 60
    }
}
