//! HTTP boundary for the trust-and-audit services
//!
//! Exposes OTP challenges, scoped token checks and the audit ledger under
//! `/api/v1`. Handlers map domain errors onto status codes and the shared
//! `ErrorResponse` body.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod settings;
pub mod telemetry;

pub use app::{create_app, AppState};
