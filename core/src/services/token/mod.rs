//! Token issuer module for scoped JWTs
//!
//! Issues and verifies HS256 tokens whose claims carry a scope and an
//! optional role. Scope and role checks are explicit in `authorize`.

mod config;
mod service;


pub use config::TokenIssuerConfig;
pub use service::{IssuedToken, TokenIssuer, VerifiedToken};
