//! Configuration for the token issuer

use chrono::Duration;
use pv_shared::config::JwtConfig;

/// Configuration for the token issuer
#[derive(Debug, Clone)]
pub struct TokenIssuerConfig {
    /// JWT signing secret
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Lifetime of the post-OTP token
    pub pending_password_ttl: Duration,
    /// Lifetime of a citizen session token
    pub session_ttl: Duration,
    /// Lifetime of officer/admin tokens
    pub role_access_ttl: Duration,
}

impl Default for TokenIssuerConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenIssuerConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            pending_password_ttl: Duration::seconds(config.pending_password_ttl_seconds),
            session_ttl: Duration::seconds(config.session_ttl_seconds),
            role_access_ttl: Duration::seconds(config.role_access_ttl_seconds),
        }
    }
}
