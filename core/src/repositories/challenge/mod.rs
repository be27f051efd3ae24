//! OTP challenge repository module.

mod r#trait;
pub use r#trait::{ChallengeRepository, InsertOutcome};

mod memory;
pub use memory::InMemoryChallengeRepository;

#[cfg(test)]
mod tests;
