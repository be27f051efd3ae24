//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{LedgerError, OtpError, TokenError, ValidationError};

use pv_shared::types::response::ErrorResponse;
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn storage(message: impl ToString) -> Self {
        DomainError::Storage {
            message: message.to_string(),
        }
    }

    pub fn internal(message: impl ToString) -> Self {
        DomainError::Internal {
            message: message.to_string(),
        }
    }

    /// Stable machine-readable code for API consumers
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Storage { .. } => "STORAGE_ERROR",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Otp(err) => err.error_code(),
            DomainError::Token(err) => err.error_code(),
            DomainError::Ledger(err) => err.error_code(),
            DomainError::ValidationErr(err) => err.error_code(),
        }
    }

    /// Whether the caller can reasonably try the same request again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::Ledger(LedgerError::ChainConflict { .. })
                | DomainError::Storage { .. }
        )
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        let response = match err {
            DomainError::Otp(otp) => ErrorResponse::from(otp),
            // Storage and internal failures never leak their cause
            DomainError::Storage { .. } | DomainError::Internal { .. } => {
                ErrorResponse::new(err.error_code(), "An internal error occurred")
            }
            _ => ErrorResponse::new(err.error_code(), err.to_string()),
        };

        if err.is_retryable() {
            response.retryable()
        } else {
            response
        }
    }
}

impl From<DomainError> for ErrorResponse {
    fn from(err: DomainError) -> Self {
        ErrorResponse::from(&err)
    }
}
