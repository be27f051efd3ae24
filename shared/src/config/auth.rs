//! Scoped token signing configuration

use serde::{Deserialize, Serialize};

use super::env_or;

const DEFAULT_SECRET: &str = "dev-secret-change-in-production";

/// JWT configuration for scoped tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JwtConfig {
    /// HMAC secret for signing tokens
    pub secret: String,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Lifetime of the token bridging OTP success to password setup, in seconds
    pub pending_password_ttl_seconds: i64,

    /// Lifetime of a full citizen session, in seconds
    pub session_ttl_seconds: i64,

    /// Lifetime of officer/admin role tokens, in seconds
    pub role_access_ttl_seconds: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            issuer: String::from("prabhav"),
            audience: String::from("prabhav-api"),
            pending_password_ttl_seconds: 15 * 60,
            session_ttl_seconds: 30 * 24 * 3600,
            role_access_ttl_seconds: 7 * 24 * 3600,
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
            pending_password_ttl_seconds: env_or(
                "JWT_PENDING_PASSWORD_TTL_SECONDS",
                defaults.pending_password_ttl_seconds,
            ),
            session_ttl_seconds: env_or("JWT_SESSION_TTL_SECONDS", defaults.session_ttl_seconds),
            role_access_ttl_seconds: env_or(
                "JWT_ROLE_ACCESS_TTL_SECONDS",
                defaults.role_access_ttl_seconds,
            ),
        }
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}
