use actix_web::{web, HttpRequest, HttpResponse, Responder};

use super::validate_token;
use crate::models::CreateAssignmentRequest;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/users/{user_id}/assignments")
            .route(web::get().to(list_assignments))
            .route(web::post().to(add_assignment)),
    );
    cfg.service(
        web::resource("/api/users/{user_id}/assignments/{domain}")
            .route(web::delete().to(remove_assignment)),
    );
}

async fn list_assignments(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    if let Err(resp) = validate_token(&state, &req) {
        return resp;
    }
    match state.db.list_assignments(path.into_inner()) {
        Ok(assignments) => HttpResponse::Ok().json(assignments),
        Err(e) => {
            log::error!("Failed to list assignments: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

/// Opt a user into a domain. Domains without an agent are accepted and simply
/// never run.
async fn add_assignment(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CreateAssignmentRequest>,
) -> impl Responder {
    if let Err(resp) = validate_token(&state, &req) {
        return resp;
    }
    let user_id = path.into_inner();
    let domain = body.domain.trim().to_lowercase();
    if domain.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Domain must not be empty"
        }));
    }

    match state.db.add_assignment(user_id, &domain) {
        Ok(created) => {
            let has_agent = state.orchestrator.registry().contains(&domain);
            if !has_agent {
                log::info!("User {} assigned to '{}' which has no agent yet", user_id, domain);
            }
            let mut builder = if created {
                HttpResponse::Created()
            } else {
                HttpResponse::Ok()
            };
            builder.json(serde_json::json!({
                "user_id": user_id,
                "domain": domain,
                "created": created,
                "has_agent": has_agent,
            }))
        }
        Err(e) => {
            log::error!("Failed to add assignment: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

async fn remove_assignment(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(i64, String)>,
) -> impl Responder {
    if let Err(resp) = validate_token(&state, &req) {
        return resp;
    }
    let (user_id, domain) = path.into_inner();
    match state.db.remove_assignment(user_id, &domain) {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("User {} is not assigned to '{}'", user_id, domain)
        })),
        Err(e) => {
            log::error!("Failed to remove assignment: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}
