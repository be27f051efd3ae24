use actix_web::{web, HttpResponse};
use chrono::Utc;
use validator::Validate;

use pv_shared::utils::identifier::mask_identifier;

use crate::app::AppState;
use crate::dto::otp::{SendChallengeRequest, SendChallengeResponse};
use crate::handlers::{domain_error_response, validation_error_response};

/// Handler for POST /api/v1/otp/send
///
/// # Request Body
///
/// ```json
/// { "identifier": "123456789012", "phone": "9876543210" }
/// ```
///
/// # Responses
///
/// * 200 with `accepted: true`. `warning` is set when no SMS provider took
///   the message; the challenge is still valid.
/// * 400 malformed identifier or phone
/// * 429 inside the resend cooldown, with `Retry-After` and `details.wait_seconds`
pub async fn send_challenge(
    state: web::Data<AppState>,
    request: web::Json<SendChallengeRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    tracing::info!(
        identifier = %mask_identifier(&request.identifier),
        "Processing send challenge request"
    );

    match state
        .services
        .otp
        .send_challenge(&request.identifier, &request.phone)
        .await
    {
        Ok(result) => {
            let resend_after = result
                .next_resend_at
                .signed_duration_since(Utc::now())
                .num_seconds()
                .max(0);

            HttpResponse::Ok().json(SendChallengeResponse {
                accepted: result.accepted,
                challenge_id: result.challenge_id,
                expires_at: result.expires_at,
                resend_after,
                delivery_provider: result.delivery_provider,
                warning: result.warning,
            })
        }
        Err(error) => domain_error_response(&error),
    }
}
