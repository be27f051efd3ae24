//! Credential hashing and identifier protection
//!
//! - salted SHA-256 digests for one-time codes, compared in constant time
//! - HMAC-SHA256 blind index for looking subjects up without storing them
//! - AES-256-GCM encryption for recovering the identifier when required

mod hasher;

pub use hasher::{generate_code, CredentialHasher, SALT_BYTES};
