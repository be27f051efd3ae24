//! # Infrastructure Layer
//!
//! Concrete adapters for the trust-and-audit core:
//!
//! - **Database**: MySQL challenge and ledger stores using SQLx
//! - **SMS**: Twilio, MSG91 and Fast2SMS delivery channels plus a mock
//! - **Bootstrap**: builds the service graph from `AppConfig`
//!
//! ## Features
//!
//! - `twilio-sms`: Enable the Twilio SMS channel (default)
//! - `mock-services`: Force the mock SMS channel regardless of credentials

use pv_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// SMS delivery channels
pub mod sms;

/// Service graph construction
pub mod bootstrap;

pub use bootstrap::{initialize, load_config, TrustServices};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Database(e) => DomainError::storage(e.to_string()),
            other => DomainError::internal(other.to_string()),
        }
    }
}

impl From<DomainError> for InfrastructureError {
    fn from(err: DomainError) -> Self {
        InfrastructureError::General(err.to_string())
    }
}
