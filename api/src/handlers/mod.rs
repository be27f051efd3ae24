//! Shared handler helpers

pub mod error;

pub use error::{domain_error_response, status_for, validation_error_response, ApiError};
