//! MySQL repository implementations

pub mod challenge_repository_impl;
pub mod ledger_repository_impl;

pub use challenge_repository_impl::MySqlChallengeRepository;
pub use ledger_repository_impl::MySqlLedgerRepository;
