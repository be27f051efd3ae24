//! Common utility functions

pub mod identifier;
pub mod phone;

// Re-export commonly used utilities
pub use identifier::*;
pub use phone::*;
