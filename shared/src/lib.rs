//! Shared utilities and common types for the Prabhav server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Response envelopes
//! - Utility functions (identifier and phone validation)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment,
    CryptoConfig, DatabaseConfig, JwtConfig, LedgerConfig, LoggingConfig,
    OtpConfig, ServerConfig, SmsConfig,
};
pub use types::{ApiResponse, ErrorResponse};
pub use utils::{identifier, phone};
