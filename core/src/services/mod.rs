//! Business services containing domain logic and use cases.

pub mod credential;
pub mod delivery;
pub mod ledger;
pub mod otp;
pub mod token;

// Re-export commonly used types
pub use credential::CredentialHasher;
pub use delivery::{DeliveryChannel, DeliveryGateway, DeliveryReport};
pub use ledger::{AuditLedger, AuditLedgerConfig, AuditRecorder, ChainVerification};
pub use otp::{OtpLifecycleConfig, OtpLifecycleManager, SendChallengeResult, VerifyChallengeResult};
pub use token::{IssuedToken, TokenIssuer, TokenIssuerConfig, VerifiedToken};
