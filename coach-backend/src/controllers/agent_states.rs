use actix_web::{web, HttpRequest, HttpResponse, Responder};
use std::str::FromStr;

use super::validate_token;
use crate::models::{AgentStatus, StateError, UpdateAgentStateRequest};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/users/{user_id}/agents").route(web::get().to(list_agent_states)));
    cfg.service(
        web::resource("/api/users/{user_id}/agents/{agent_name}")
            .route(web::get().to(get_agent_state))
            .route(web::put().to(update_agent_state)),
    );
}

/// List explicit state rows for a user (agents without a row are active)
async fn list_agent_states(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    if let Err(resp) = validate_token(&state, &req) {
        return resp;
    }
    match state.db.list_agent_states(path.into_inner()) {
        Ok(states) => HttpResponse::Ok().json(states),
        Err(e) => {
            log::error!("Failed to list agent states: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

async fn get_agent_state(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(i64, String)>,
) -> impl Responder {
    if let Err(resp) = validate_token(&state, &req) {
        return resp;
    }
    let (user_id, agent_name) = path.into_inner();
    match state.db.get_agent_state(user_id, &agent_name) {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::Ok().json(serde_json::json!({
            "user_id": user_id,
            "agent_name": agent_name,
            "state": AgentStatus::Active,
            "access_tier": null,
            "updated_at": null,
        })),
        Err(e) => {
            log::error!("Failed to get agent state: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

/// Create or transition an agent's state
async fn update_agent_state(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(i64, String)>,
    body: web::Json<UpdateAgentStateRequest>,
) -> impl Responder {
    if let Err(resp) = validate_token(&state, &req) {
        return resp;
    }
    let (user_id, agent_name) = path.into_inner();

    let target = match AgentStatus::from_str(body.state.trim()) {
        Ok(s) => s,
        Err(_) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("Unknown state '{}'", body.state)
            }));
        }
    };

    match state
        .db
        .set_agent_state(user_id, &agent_name, target, body.access_tier.as_deref())
    {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(StateError::InvalidTransition { from, to }) => {
            HttpResponse::Conflict().json(serde_json::json!({
                "error": format!("Invalid transition from {} to {}", from, to),
                "current_state": from,
                "allowed": from.allowed_transitions(),
            }))
        }
        Err(StateError::Database(e)) => {
            log::error!("Failed to update agent state: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}
