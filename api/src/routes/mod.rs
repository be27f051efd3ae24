//! Route handlers grouped by resource

pub mod ledger;
pub mod otp;
pub mod token;

use actix_web::web;

/// Register every `/api/v1` resource
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/otp").configure(otp::configure))
        .service(web::scope("/ledger").configure(ledger::configure))
        .service(web::scope("/token").configure(token::configure));
}
