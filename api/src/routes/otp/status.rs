use actix_web::{web, HttpResponse};
use validator::Validate;

use pv_shared::utils::identifier::mask_identifier;

use crate::app::AppState;
use crate::dto::otp::{ClearChallengesResponse, IdentifierRequest, VerificationStatusResponse};
use crate::handlers::{domain_error_response, validation_error_response};
use crate::middleware::AuthContext;

/// Handler for POST /api/v1/otp/status
pub async fn verification_status(
    state: web::Data<AppState>,
    request: web::Json<IdentifierRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.services.otp.is_verified(&request.identifier).await {
        Ok(verified) => HttpResponse::Ok().json(VerificationStatusResponse { verified }),
        Err(error) => domain_error_response(&error),
    }
}

/// Handler for POST /api/v1/otp/clear (admin role-access token)
pub async fn clear_challenges(
    auth: AuthContext,
    state: web::Data<AppState>,
    request: web::Json<IdentifierRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    tracing::info!(
        admin = %auth.subject,
        identifier = %mask_identifier(&request.identifier),
        "Clearing challenges"
    );

    match state.services.otp.clear(&request.identifier).await {
        Ok(removed) => HttpResponse::Ok().json(ClearChallengesResponse { removed }),
        Err(error) => domain_error_response(&error),
    }
}
