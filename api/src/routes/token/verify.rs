use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::app::AppState;
use crate::dto::token::{VerifyTokenRequest, VerifyTokenResponse};
use crate::handlers::{domain_error_response, validation_error_response};

/// Handler for POST /api/v1/token/verify
///
/// Checks signature and validity window, and the scope when one is given.
/// Failures answer 401 (bad or expired token) or 403 (wrong scope).
pub async fn verify_token(
    state: web::Data<AppState>,
    request: web::Json<VerifyTokenRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let tokens = &state.services.tokens;
    let result = match request.scope {
        Some(scope) => tokens.authorize(&request.token, scope, &[]),
        None => tokens.verify(&request.token),
    };

    match result {
        Ok(verified) => HttpResponse::Ok().json(VerifyTokenResponse {
            valid: true,
            subject: verified.subject,
            scope: verified.scope,
            role: verified.role,
            expires_at: verified.expires_at,
        }),
        Err(error) => domain_error_response(&error),
    }
}
