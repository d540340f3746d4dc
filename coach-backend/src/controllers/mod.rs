pub mod agent_states;
pub mod assignments;
pub mod coaching;
pub mod executions;
pub mod health;

use actix_web::{web, HttpRequest, HttpResponse};
use crate::AppState;

/// Validate the bearer token on a request against the configured secret
pub(crate) fn validate_token(
    state: &web::Data<AppState>,
    req: &HttpRequest,
) -> Result<(), HttpResponse> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim_start_matches("Bearer ").to_string());

    match token {
        None => Err(HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "No authorization token provided"
        }))),
        Some(t) if t != state.config.secret_key => Err(HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid authorization token"
        }))),
        Some(_) => Ok(()),
    }
}
