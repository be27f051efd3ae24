//! Keys protecting subject identifiers at rest

use serde::{Deserialize, Serialize};

const DEFAULT_ENCRYPTION_KEY: &str =
    "6465762d656e6372797074696f6e2d6b65792d706c656173652d6368616e6765";
const DEFAULT_INDEX_KEY: &str =
    "6465762d626c696e642d696e6465782d6b65792d706c656173652d6368616e67";

/// Hex-encoded 256-bit keys for identifier encryption and blind indexing
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// AES-256-GCM key for reversible identifier encryption (64 hex chars)
    pub encryption_key_hex: String,

    /// HMAC-SHA256 key for the deterministic lookup index (64 hex chars)
    pub index_key_hex: String,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            encryption_key_hex: String::from(DEFAULT_ENCRYPTION_KEY),
            index_key_hex: String::from(DEFAULT_INDEX_KEY),
        }
    }
}

impl CryptoConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            encryption_key_hex: std::env::var("IDENTIFIER_ENCRYPTION_KEY")
                .unwrap_or(defaults.encryption_key_hex),
            index_key_hex: std::env::var("IDENTIFIER_INDEX_KEY").unwrap_or(defaults.index_key_hex),
        }
    }

    /// Check if either key is still the development default
    pub fn is_using_default_keys(&self) -> bool {
        self.encryption_key_hex == DEFAULT_ENCRYPTION_KEY || self.index_key_hex == DEFAULT_INDEX_KEY
    }
}
