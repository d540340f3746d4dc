use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use super::validate_token;
use crate::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ExecutionsQuery {
    pub limit: Option<i64>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/users/{user_id}/executions").route(web::get().to(list_executions)));
}

/// Recent agent execution log for a user, newest first
async fn list_executions(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<ExecutionsQuery>,
) -> impl Responder {
    if let Err(resp) = validate_token(&state, &req) {
        return resp;
    }
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    match state.db.list_execution_logs(path.into_inner(), limit) {
        Ok(logs) => HttpResponse::Ok().json(logs),
        Err(e) => {
            log::error!("Failed to list execution logs: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}
