use actix_web::{web, HttpResponse};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::app::AppState;
use crate::dto::ledger::AppendBlockRequest;
use crate::handlers::{domain_error_response, validation_error_response};
use crate::middleware::AuthContext;

/// Handler for POST /api/v1/ledger/blocks
///
/// The caller's subject and role are recorded in the block metadata as
/// `actor` and `actor_role`. Answers 201 with the sealed block, or 409 with
/// `retryable: true` when the chain stayed contended.
pub async fn append_block(
    auth: AuthContext,
    state: web::Data<AppState>,
    request: web::Json<AppendBlockRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let request = request.into_inner();
    let mut metadata = match request.metadata {
        Some(JsonValue::Object(map)) => map,
        None | Some(JsonValue::Null) => serde_json::Map::new(),
        Some(other) => {
            let mut map = serde_json::Map::new();
            map.insert("value".to_string(), other);
            map
        }
    };
    metadata.insert("actor".to_string(), JsonValue::String(auth.subject.clone()));
    if let Some(role) = auth.role {
        metadata.insert("actor_role".to_string(), JsonValue::String(role.to_string()));
    }

    match state
        .services
        .ledger
        .append(&request.action, &request.subject, JsonValue::Object(metadata))
        .await
    {
        Ok(block) => HttpResponse::Created().json(block),
        Err(error) => domain_error_response(&error),
    }
}
