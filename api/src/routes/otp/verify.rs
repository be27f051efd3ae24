use actix_web::{web, HttpResponse};
use validator::Validate;

use pv_core::domain::entities::TokenScope;
use pv_core::services::otp::VerifyChallengeResult;

use crate::app::AppState;
use crate::dto::otp::{VerifyAssertionRequest, VerifyChallengeRequest, VerifyChallengeResponse};
use crate::handlers::{domain_error_response, validation_error_response};

fn verified_response(result: VerifyChallengeResult) -> HttpResponse {
    HttpResponse::Ok().json(VerifyChallengeResponse {
        verified: true,
        challenge_id: result.challenge_id,
        scope: TokenScope::OtpVerifiedPendingPassword,
        scoped_token: result.scoped_token,
        token_expires_at: result.token_expires_at,
    })
}

/// Handler for POST /api/v1/otp/verify
///
/// A wrong code answers 400 with `details.remaining_attempts`; the attempt
/// that reaches the attempt limit removes the challenge.
pub async fn verify_challenge(
    state: web::Data<AppState>,
    request: web::Json<VerifyChallengeRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .services
        .otp
        .verify_challenge(&request.identifier, &request.code)
        .await
    {
        Ok(result) => verified_response(result),
        Err(error) => domain_error_response(&error),
    }
}

/// Handler for POST /api/v1/otp/verify-assertion
pub async fn verify_assertion(
    state: web::Data<AppState>,
    request: web::Json<VerifyAssertionRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .services
        .otp
        .verify_by_external_assertion(&request.identifier, &request.phone)
        .await
    {
        Ok(result) => verified_response(result),
        Err(error) => domain_error_response(&error),
    }
}
