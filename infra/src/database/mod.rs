//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management
//! - Challenge store with per-subject advisory locking
//! - Append-only audit block store guarded by unique chain links

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlChallengeRepository, MySqlLedgerRepository};

/// Map a SQLx failure onto the domain's storage error
pub(crate) fn storage_error(context: &str, err: sqlx::Error) -> pv_core::errors::DomainError {
    tracing::error!(error = %err, "{}", context);
    pv_core::errors::DomainError::storage(format!("{}: {}", context, err))
}

/// Whether a SQLx failure is a unique-key violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
