//! Domain entities representing core business objects.

pub mod audit_block;
pub mod challenge;
pub mod token;

// Re-export commonly used types
pub use audit_block::{actions, AuditBlock, GENESIS_HASH};
pub use challenge::{Challenge, CODE_LENGTH};
pub use token::{Claims, Role, TokenScope};
