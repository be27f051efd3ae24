//! Mapping from domain errors to HTTP responses

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use std::fmt;
use validator::ValidationErrors;

use pv_core::errors::{DomainError, LedgerError, OtpError, TokenError};
use pv_shared::types::response::ErrorResponse;

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::ValidationErr(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Storage { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Otp(otp) => match otp {
            OtpError::CooldownActive { .. } | OtpError::TooManyAttempts => {
                StatusCode::TOO_MANY_REQUESTS
            }
            OtpError::ChallengeNotFound => StatusCode::NOT_FOUND,
            OtpError::ChallengeExpired => StatusCode::GONE,
            OtpError::InvalidCode { .. } => StatusCode::BAD_REQUEST,
            OtpError::DeliveryFailure { .. } => StatusCode::SERVICE_UNAVAILABLE,
        },
        DomainError::Token(token) => match token {
            TokenError::ScopeMismatch { .. } | TokenError::InsufficientPermissions => {
                StatusCode::FORBIDDEN
            }
            TokenError::TokenGenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        },
        DomainError::Ledger(LedgerError::ChainConflict { .. }) => StatusCode::CONFLICT,
    }
}

/// Build the JSON error response for a domain error
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    let status = status_for(error);
    if status.is_server_error() {
        tracing::error!(code = error.error_code(), error = %error, "Request failed");
    } else {
        tracing::debug!(code = error.error_code(), error = %error, "Request rejected");
    }

    let mut builder = HttpResponse::build(status);
    if let DomainError::Otp(OtpError::CooldownActive { wait_seconds }) = error {
        builder.insert_header((header::RETRY_AFTER, wait_seconds.to_string()));
    }
    builder.json(ErrorResponse::from(error))
}

/// 400 response listing the failing fields
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new("VALIDATION_ERROR", "Invalid request data");
    for (field, errs) in errors.field_errors() {
        let messages: Vec<String> = errs
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.with_detail(field, serde_json::json!(messages));
    }

    tracing::debug!(details = ?response.details, "Request validation failed");
    HttpResponse::BadRequest().json(response)
}

/// Domain error carried through actix's error path (used by middleware)
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(&self.0)
    }

    fn error_response(&self) -> HttpResponse {
        domain_error_response(&self.0)
    }
}
