//! OTP challenge endpoints
//!
//! - `POST /send` issue and deliver a code
//! - `POST /verify` check a code
//! - `POST /verify-assertion` verify on an external phone attestation
//! - `POST /status` whether the subject has verified
//! - `POST /clear` drop every challenge for a subject (admin)

pub mod send;
pub mod status;
pub mod verify;

use actix_web::web;

use crate::middleware::JwtAuth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/send", web::post().to(send::send_challenge))
        .route("/verify", web::post().to(verify::verify_challenge))
        .route(
            "/verify-assertion",
            web::post().to(verify::verify_assertion),
        )
        .route("/status", web::post().to(status::verification_status))
        .route(
            "/clear",
            web::post()
                .to(status::clear_challenges)
                .wrap(JwtAuth::admin()),
        );
}
