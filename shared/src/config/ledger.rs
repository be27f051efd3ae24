//! Audit ledger configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Append behaviour for the hash-chained audit ledger
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Conditional append attempts before a chain conflict is surfaced
    pub append_max_retries: u32,

    /// Base backoff between conflicting appends, in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            append_max_retries: 5,
            retry_backoff_ms: 10,
        }
    }
}

impl LedgerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            append_max_retries: env_or("LEDGER_APPEND_MAX_RETRIES", defaults.append_max_retries),
            retry_backoff_ms: env_or("LEDGER_RETRY_BACKOFF_MS", defaults.retry_backoff_ms),
        }
    }
}
