pub mod challenge;
pub mod ledger;

pub use challenge::{ChallengeRepository, InMemoryChallengeRepository, InsertOutcome};
pub use ledger::{AppendOutcome, InMemoryLedgerRepository, LedgerRepository};
