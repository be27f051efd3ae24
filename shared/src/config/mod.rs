//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Scoped token signing configuration
//! - `crypto` - Keys for identifier encryption and blind indexing
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `ledger` - Audit ledger append behaviour
//! - `otp` - One-time passcode lifecycle limits
//! - `server` - HTTP server configuration
//! - `sms` - SMS delivery provider credentials

pub mod auth;
pub mod crypto;
pub mod database;
pub mod environment;
pub mod ledger;
pub mod otp;
pub mod server;
pub mod sms;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::JwtConfig;
pub use crypto::CryptoConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use ledger::LedgerConfig;
pub use otp::OtpConfig;
pub use server::ServerConfig;
pub use sms::{Fast2SmsConfig, Msg91Config, SmsConfig, TwilioConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Token signing configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Identifier encryption configuration
    #[serde(default)]
    pub crypto: CryptoConfig,

    /// OTP lifecycle configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Audit ledger configuration
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// SMS provider configuration
    #[serde(default)]
    pub sms: SmsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            crypto: CryptoConfig::from_env(),
            otp: OtpConfig::from_env(),
            ledger: LedgerConfig::from_env(),
            sms: SmsConfig::from_env(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Names of secrets still carrying their development defaults
    pub fn insecure_defaults(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.jwt.is_using_default_secret() {
            names.push("JWT_SECRET");
        }
        if self.crypto.is_using_default_keys() {
            names.push("IDENTIFIER_ENCRYPTION_KEY/IDENTIFIER_INDEX_KEY");
        }
        names
    }
}

/// Read an environment variable and parse it, falling back to a default
pub(crate) fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
