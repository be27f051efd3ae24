use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::ledger::BlockListResponse;
use crate::handlers::domain_error_response;

/// Handler for GET /api/v1/ledger/blocks
pub async fn list_blocks(state: web::Data<AppState>) -> HttpResponse {
    match state.services.ledger.list().await {
        Ok(blocks) => HttpResponse::Ok().json(BlockListResponse::from(blocks)),
        Err(error) => domain_error_response(&error),
    }
}

/// Handler for GET /api/v1/ledger/verify
///
/// Always 200 when the chain could be read; a broken chain is reported in
/// the body with the first bad index.
pub async fn verify_chain(state: web::Data<AppState>) -> HttpResponse {
    match state.services.ledger.verify_chain().await {
        Ok(verification) => {
            if !verification.is_intact() {
                tracing::error!(result = ?verification, "Audit chain verification failed");
            }
            HttpResponse::Ok().json(verification)
        }
        Err(error) => domain_error_response(&error),
    }
}

/// Handler for GET /api/v1/ledger/trail/{subject}
pub async fn subject_trail(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match state.services.ledger.trail_for(&path.into_inner()).await {
        Ok(blocks) => HttpResponse::Ok().json(BlockListResponse::from(blocks)),
        Err(error) => domain_error_response(&error),
    }
}
