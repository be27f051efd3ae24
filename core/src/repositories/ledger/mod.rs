//! Audit ledger repository module.

mod r#trait;
pub use r#trait::{AppendOutcome, LedgerRepository};

mod memory;
pub use memory::InMemoryLedgerRepository;

#[cfg(test)]
mod tests;
