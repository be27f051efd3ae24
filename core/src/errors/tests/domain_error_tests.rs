//! Unit tests for domain error types

use crate::errors::{DomainError, LedgerError, OtpError, TokenError, ValidationError};
use pv_shared::types::response::ErrorResponse;

#[test]
fn test_otp_error_messages() {
    let error = OtpError::CooldownActive { wait_seconds: 17 };
    assert!(error.to_string().contains("17 seconds"));

    let error = OtpError::InvalidCode {
        remaining_attempts: 4,
    };
    assert!(error.to_string().contains("4 attempts remaining"));
}

#[test]
fn test_cooldown_conversion_carries_wait_seconds() {
    let error: DomainError = OtpError::CooldownActive { wait_seconds: 12 }.into();
    let response = ErrorResponse::from(&error);

    assert_eq!(response.error, "COOLDOWN_ACTIVE");
    assert!(!response.retryable);
    let details = response.details.expect("details present");
    assert_eq!(details["wait_seconds"], 12);
}

#[test]
fn test_invalid_code_conversion_carries_remaining_attempts() {
    let error: DomainError = OtpError::InvalidCode {
        remaining_attempts: 2,
    }
    .into();
    let response: ErrorResponse = error.into();

    assert_eq!(response.error, "INVALID_CODE");
    assert_eq!(response.details.unwrap()["remaining_attempts"], 2);
}

#[test]
fn test_delivery_failure_lists_providers() {
    let error = OtpError::DeliveryFailure {
        providers: vec!["twilio".to_string(), "msg91".to_string()],
    };
    assert!(error.to_string().contains("twilio, msg91"));
    assert_eq!(error.error_code(), "DELIVERY_FAILURE");
}

#[test]
fn test_chain_conflict_is_retryable() {
    let error: DomainError = LedgerError::ChainConflict { attempts: 5 }.into();
    assert!(error.is_retryable());
    assert_eq!(error.error_code(), "CHAIN_CONFLICT");

    let response = ErrorResponse::from(&error);
    assert!(response.retryable);
}

#[test]
fn test_token_error_conversion() {
    let response: ErrorResponse = TokenError::TokenExpired.into();
    assert_eq!(response.error, "TOKEN_EXPIRED");
    assert_eq!(response.message, "Token expired");
}

#[test]
fn test_validation_error_codes() {
    assert_eq!(
        ValidationError::InvalidIdentifier.error_code(),
        "INVALID_IDENTIFIER"
    );
    let error: DomainError = ValidationError::RequiredField {
        field: "action".to_string(),
    }
    .into();
    assert_eq!(error.error_code(), "REQUIRED_FIELD");
    assert!(error.to_string().contains("action"));
}

#[test]
fn test_internal_errors_do_not_leak_details() {
    let error = DomainError::storage("connection refused at 10.0.0.3:3306");
    let response = ErrorResponse::from(&error);

    assert_eq!(response.error, "STORAGE_ERROR");
    assert!(!response.message.contains("10.0.0.3"));
    assert!(response.retryable);
}
