//! Audit ledger module for the tamper-evident, hash-chained event log.

mod config;
mod recorder;
mod service;
mod types;

pub use config::AuditLedgerConfig;
pub use recorder::AuditRecorder;
pub use service::AuditLedger;
pub use types::ChainVerification;

#[cfg(test)]
mod tests;
