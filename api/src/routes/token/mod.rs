//! Scoped token endpoints

pub mod verify;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/verify", web::post().to(verify::verify_token));
}
