use std::time::Duration;

use pv_shared::config::LedgerConfig;

/// Configuration for the audit ledger
#[derive(Debug, Clone)]
pub struct AuditLedgerConfig {
    /// Conditional append attempts before giving up with a chain conflict
    pub max_retries: u32,
    /// Backoff unit; attempt `n` waits `n * retry_backoff`
    pub retry_backoff: Duration,
}

impl Default for AuditLedgerConfig {
    fn default() -> Self {
        Self::from(&LedgerConfig::default())
    }
}

impl From<&LedgerConfig> for AuditLedgerConfig {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            max_retries: config.append_max_retries.max(1),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}
