//! Application state and factory
//!
//! `create_app` is shared by `main` and the integration tests so both run
//! the same routes, extractors and middleware.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::InternalError,
    web, App, Error, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use pv_infra::TrustServices;
use pv_shared::types::response::ErrorResponse;

use crate::routes;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub services: TrustServices,
}

impl AppState {
    pub fn new(services: TrustServices) -> Self {
        Self { services }
    }
}

/// Create and configure the application
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(app_state)
        .app_data(json_config())
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .configure(routes::configure)
                .route("/", web::get().to(api_documentation)),
        )
        .default_service(web::route().to(not_found))
}

/// Malformed bodies answer with the regular error shape
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| {
            let body = ErrorResponse::new("INVALID_REQUEST_BODY", err.to_string());
            InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
        })
}

async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let storage_healthy = state.services.storage_healthy().await;
    let body = serde_json::json!({
        "status": if storage_healthy { "healthy" } else { "degraded" },
        "service": "prabhav-trust-api",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": {
            "backend": state.services.storage_backend(),
            "healthy": storage_healthy,
            "pool": state.services.storage_statistics(),
        },
        "sms_providers": state.services.gateway.provider_names(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if storage_healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

async fn api_documentation() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Prabhav trust and audit API v1",
        "endpoints": {
            "health": "/health",
            "otp": {
                "send": { "path": "/api/v1/otp/send", "method": "POST" },
                "verify": { "path": "/api/v1/otp/verify", "method": "POST" },
                "verify_assertion": { "path": "/api/v1/otp/verify-assertion", "method": "POST" },
                "status": { "path": "/api/v1/otp/status", "method": "POST" },
                "clear": { "path": "/api/v1/otp/clear", "method": "POST", "auth": "admin" }
            },
            "ledger": {
                "append": { "path": "/api/v1/ledger/blocks", "method": "POST", "auth": "officer" },
                "list": { "path": "/api/v1/ledger/blocks", "method": "GET" },
                "verify": { "path": "/api/v1/ledger/verify", "method": "GET" },
                "trail": { "path": "/api/v1/ledger/trail/{subject}", "method": "GET" }
            },
            "token": {
                "verify": { "path": "/api/v1/token/verify", "method": "POST" }
            }
        }
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "NOT_FOUND",
        "The requested resource was not found",
    ))
}
