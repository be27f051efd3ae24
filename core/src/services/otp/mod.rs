//! OTP lifecycle module
//!
//! Issues one-time passcodes, enforces resend cooldown, expiry and bounded
//! attempts, and exchanges a successful verification for a scoped token.

mod config;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::OtpLifecycleConfig;
pub use service::OtpLifecycleManager;
pub use types::{SendChallengeResult, VerifyChallengeResult};
