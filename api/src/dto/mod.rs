//! Request and response bodies

pub mod ledger;
pub mod otp;
pub mod token;

pub use pv_shared::types::response::ErrorResponse;
