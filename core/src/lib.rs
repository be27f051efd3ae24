//! # Prabhav Core
//!
//! Trust-and-audit domain layer: the OTP credential lifecycle, scoped
//! tokens and the hash-chained audit ledger. Storage and SMS providers are
//! reached through the traits defined here and implemented in `pv_infra`.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
