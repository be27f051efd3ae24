//! Error types for the OTP lifecycle, scoped tokens, the audit ledger and
//! input validation.

use pv_shared::types::response::ErrorResponse;
use thiserror::Error;

/// OTP challenge lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Please wait {wait_seconds} seconds before requesting another code")]
    CooldownActive { wait_seconds: i64 },

    #[error("No active verification code found")]
    ChallengeNotFound,

    #[error("Verification code expired")]
    ChallengeExpired,

    #[error("Too many failed attempts. Please request a new code")]
    TooManyAttempts,

    #[error("Invalid verification code. {remaining_attempts} attempts remaining")]
    InvalidCode { remaining_attempts: u32 },

    #[error("Code delivery failed on every provider: {}", providers.join(", "))]
    DeliveryFailure { providers: Vec<String> },
}

impl OtpError {
    pub fn error_code(&self) -> &'static str {
        match self {
            OtpError::CooldownActive { .. } => "COOLDOWN_ACTIVE",
            OtpError::ChallengeNotFound => "CHALLENGE_NOT_FOUND",
            OtpError::ChallengeExpired => "CHALLENGE_EXPIRED",
            OtpError::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            OtpError::InvalidCode { .. } => "INVALID_CODE",
            OtpError::DeliveryFailure { .. } => "DELIVERY_FAILURE",
        }
    }
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Token scope {actual} does not grant {expected}")]
    ScopeMismatch { expected: String, actual: String },

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::TokenExpired => "TOKEN_EXPIRED",
            TokenError::InvalidTokenFormat => "INVALID_TOKEN_FORMAT",
            TokenError::InvalidSignature => "INVALID_SIGNATURE",
            TokenError::TokenNotYetValid => "TOKEN_NOT_YET_VALID",
            TokenError::InvalidClaims => "INVALID_CLAIMS",
            TokenError::ScopeMismatch { .. } => "SCOPE_MISMATCH",
            TokenError::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
        }
    }
}

/// Audit ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Ledger tail kept moving; append abandoned after {attempts} attempts")]
    ChainConflict { attempts: u32 },
}

impl LedgerError {
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::ChainConflict { .. } => "CHAIN_CONFLICT",
        }
    }
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Identifier must be exactly 12 digits")]
    InvalidIdentifier,

    #[error("Phone number must be exactly 10 digits")]
    InvalidPhone,

    #[error("Verification code must be exactly 6 digits")]
    InvalidCodeFormat,

    #[error("Required field: {field}")]
    RequiredField { field: String },
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidIdentifier => "INVALID_IDENTIFIER",
            ValidationError::InvalidPhone => "INVALID_PHONE",
            ValidationError::InvalidCodeFormat => "INVALID_CODE_FORMAT",
            ValidationError::RequiredField { .. } => "REQUIRED_FIELD",
        }
    }
}

/// Convert OtpError to ErrorResponse, carrying the numbers clients act on
impl From<&OtpError> for ErrorResponse {
    fn from(err: &OtpError) -> Self {
        let response = ErrorResponse::new(err.error_code(), err.to_string());
        match err {
            OtpError::CooldownActive { wait_seconds } => {
                response.with_detail("wait_seconds", serde_json::json!(wait_seconds))
            }
            OtpError::InvalidCode { remaining_attempts } => response.with_detail(
                "remaining_attempts",
                serde_json::json!(remaining_attempts),
            ),
            _ => response,
        }
    }
}

impl From<TokenError> for ErrorResponse {
    fn from(err: TokenError) -> Self {
        ErrorResponse::new(err.error_code(), err.to_string())
    }
}

impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        ErrorResponse::new(err.error_code(), err.to_string())
    }
}
