use serde::{Deserialize, Serialize};

/// Outcome of walking the chain and recomputing every hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChainVerification {
    Intact {
        length: usize,
    },
    Broken {
        /// Zero-based position of the first bad block
        index: usize,
        sequence: u64,
        expected_hash: String,
        stored_hash: String,
    },
}

impl ChainVerification {
    pub fn is_intact(&self) -> bool {
        matches!(self, ChainVerification::Intact { .. })
    }
}
