//! Credential hasher implementation

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use pv_shared::config::CryptoConfig;
use rand::{rngs::OsRng, Rng, RngCore};
use sha2::{Digest, Sha256};

use crate::domain::entities::challenge::CODE_LENGTH;
use crate::errors::{DomainError, DomainResult};

type HmacSha256 = Hmac<Sha256>;

/// Random bytes in a per-challenge salt
pub const SALT_BYTES: usize = 16;

const KEY_BYTES: usize = 32;
const NONCE_BYTES: usize = 12;

/// Uniformly random numeric code of `CODE_LENGTH` digits, zero padded
pub fn generate_code() -> String {
    let upper = 10u32.pow(CODE_LENGTH as u32);
    let code: u32 = OsRng.gen_range(0..upper);
    format!("{:0width$}", code, width = CODE_LENGTH)
}

/// Hashes codes and protects subject identifiers
#[derive(Clone)]
pub struct CredentialHasher {
    cipher: Aes256Gcm,
    index_key: Vec<u8>,
}

impl CredentialHasher {
    /// Build from raw 32-byte encryption and index keys
    pub fn new(encryption_key: &[u8], index_key: &[u8]) -> DomainResult<Self> {
        if encryption_key.len() != KEY_BYTES || index_key.len() != KEY_BYTES {
            return Err(DomainError::Internal {
                message: "Identifier keys must be 32 bytes".to_string(),
            });
        }

        let key = Key::<Aes256Gcm>::from_slice(encryption_key);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
            index_key: index_key.to_vec(),
        })
    }

    /// Build from hex-encoded keys in configuration
    pub fn from_config(config: &CryptoConfig) -> DomainResult<Self> {
        let encryption_key = hex::decode(config.encryption_key_hex.trim()).map_err(|e| {
            DomainError::Internal {
                message: format!("Invalid identifier encryption key: {}", e),
            }
        })?;
        let index_key =
            hex::decode(config.index_key_hex.trim()).map_err(|e| DomainError::Internal {
                message: format!("Invalid identifier index key: {}", e),
            })?;

        Self::new(&encryption_key, &index_key)
    }

    /// Fresh random salt, hex encoded
    pub fn generate_salt() -> String {
        let mut salt = [0u8; SALT_BYTES];
        OsRng.fill_bytes(&mut salt);
        hex::encode(salt)
    }

    /// Hex SHA-256 of the code followed by its salt
    pub fn hash_code(code: &str, salt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(code.as_bytes());
        hasher.update(salt.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Constant-time comparison of a candidate code against a stored digest
    pub fn verify_code(code: &str, salt: &str, expected_hash: &str) -> bool {
        let candidate = Self::hash_code(code, salt);
        constant_time_eq(candidate.as_bytes(), expected_hash.as_bytes())
    }

    /// Deterministic keyed index of an identifier (hex HMAC-SHA256)
    pub fn blind_index(&self, identifier: &str) -> DomainResult<String> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.index_key).map_err(|_| {
            DomainError::Internal {
                message: "Invalid blind index key".to_string(),
            }
        })?;
        mac.update(identifier.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Encrypt an identifier as `base64(nonce):base64(ciphertext)`
    pub fn encrypt_identifier(&self, identifier: &str) -> DomainResult<String> {
        let mut nonce = [0u8; NONCE_BYTES];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), identifier.as_bytes())
            .map_err(|e| DomainError::Internal {
                message: format!("Encryption failed: {}", e),
            })?;

        Ok(format!("{}:{}", BASE64.encode(nonce), BASE64.encode(ciphertext)))
    }

    /// Reverse of `encrypt_identifier`
    pub fn decrypt_identifier(&self, stored: &str) -> DomainResult<String> {
        let malformed = || DomainError::Internal {
            message: "Malformed encrypted identifier".to_string(),
        };

        let (nonce_b64, ciphertext_b64) = stored.split_once(':').ok_or_else(malformed)?;
        let nonce = BASE64.decode(nonce_b64).map_err(|_| malformed())?;
        let ciphertext = BASE64.decode(ciphertext_b64).map_err(|_| malformed())?;
        if nonce.len() != NONCE_BYTES {
            return Err(malformed());
        }

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&nonce), ciphertext.as_ref())
            .map_err(|e| DomainError::Internal {
                message: format!("Decryption failed: {}", e),
            })?;

        String::from_utf8(plaintext).map_err(|_| malformed())
    }
}
