//! Audit ledger endpoints
//!
//! - `POST /blocks` append (officer or admin role-access token)
//! - `GET /blocks` whole chain in order
//! - `GET /verify` recompute every link
//! - `GET /trail/{subject}` blocks for one complaint

pub mod append;
pub mod query;

use actix_web::web;

use crate::middleware::JwtAuth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/blocks",
        web::post()
            .to(append::append_block)
            .wrap(JwtAuth::officer()),
    )
    .route("/blocks", web::get().to(query::list_blocks))
    .route("/verify", web::get().to(query::verify_chain))
    .route("/trail/{subject}", web::get().to(query::subject_trail));
}
