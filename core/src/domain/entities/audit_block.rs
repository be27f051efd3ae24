//! Hash-chained audit block.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};

/// `prev_hash` of the first block in the chain
pub const GENESIS_HASH: &str = "0";

/// Well-known audit actions
pub mod actions {
    pub const UPDATE_STATUS: &str = "UpdateStatus";
    pub const UPLOAD_IMAGES: &str = "UploadImages";
    pub const OTP_DELIVERY: &str = "OtpDelivery";
}

/// One entry in the append-only audit chain.
///
/// `hash` covers action, subject, timestamp, the previous block's hash and
/// the canonical JSON of `metadata`, so editing any stored field or
/// reordering blocks is detectable by recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditBlock {
    /// Position in the chain, starting at 1
    pub sequence: u64,

    /// Creation time in milliseconds since the epoch
    pub timestamp_ms: i64,

    pub action: String,
    pub subject: String,
    pub metadata: JsonValue,
    pub prev_hash: String,
    pub hash: String,
}

impl AuditBlock {
    /// Builds a block and seals it with its computed hash
    pub fn new(
        sequence: u64,
        action: impl Into<String>,
        subject: impl Into<String>,
        metadata: JsonValue,
        prev_hash: impl Into<String>,
        timestamp_ms: i64,
    ) -> Self {
        let action = action.into();
        let subject = subject.into();
        let prev_hash = prev_hash.into();
        let metadata = match metadata {
            JsonValue::Null => JsonValue::Object(Default::default()),
            other => other,
        };
        let hash = Self::compute_hash(&action, &subject, timestamp_ms, &prev_hash, &metadata);

        Self {
            sequence,
            timestamp_ms,
            action,
            subject,
            metadata,
            prev_hash,
            hash,
        }
    }

    /// SHA-256 hex of `action|subject|timestamp_ms|prev_hash|metadata_json`
    pub fn compute_hash(
        action: &str,
        subject: &str,
        timestamp_ms: i64,
        prev_hash: &str,
        metadata: &JsonValue,
    ) -> String {
        let metadata_json = match metadata {
            JsonValue::Null => "{}".to_string(),
            other => other.to_string(),
        };
        let payload = format!(
            "{}|{}|{}|{}|{}",
            action, subject, timestamp_ms, prev_hash, metadata_json
        );
        hex::encode(Sha256::digest(payload.as_bytes()))
    }

    /// Hash this block's content would have if it followed `prev_hash`
    pub fn hash_after(&self, prev_hash: &str) -> String {
        Self::compute_hash(
            &self.action,
            &self.subject,
            self.timestamp_ms,
            prev_hash,
            &self.metadata,
        )
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_hash == GENESIS_HASH
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp_ms)
            .single()
            .unwrap_or_default()
    }
}
