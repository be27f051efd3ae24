use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use pv_core::domain::entities::AuditBlock;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppendBlockRequest {
    /// Action name, e.g. "UpdateStatus"
    #[validate(length(min = 1, max = 64))]
    pub action: String,

    /// Complaint (or other subject) the action applies to
    #[validate(length(min = 1, max = 128))]
    pub subject: String,

    #[serde(default)]
    pub metadata: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockListResponse {
    pub length: usize,
    pub blocks: Vec<AuditBlock>,
}

impl From<Vec<AuditBlock>> for BlockListResponse {
    fn from(blocks: Vec<AuditBlock>) -> Self {
        Self {
            length: blocks.len(),
            blocks,
        }
    }
}
