use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::validate_token;
use crate::coaching::{format_replies, OrchestrationError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CoachRequest {
    pub prompt: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/users/{user_id}/coach").route(web::post().to(coach)));
}

/// Run every eligible coaching agent for the user's prompt
async fn coach(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CoachRequest>,
) -> impl Responder {
    if let Err(resp) = validate_token(&state, &req) {
        return resp;
    }
    let user_id = path.into_inner();
    let prompt = body.into_inner().prompt;
    if prompt.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Prompt must not be empty"
        }));
    }

    // The run happens on its own task; if the client goes away this handler is
    // dropped, the guard cancels the token and the run stops after the agent
    // that is currently in flight.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let orchestrator = state.orchestrator.clone();
    let handle = tokio::spawn(async move {
        orchestrator
            .process_user_prompt_with_cancel(user_id, &prompt, cancel)
            .await
    });

    let result = match handle.await {
        Ok(result) => result,
        Err(e) => {
            log::error!("Coaching run for user {} aborted: {}", user_id, e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Coaching run aborted"
            }));
        }
    };

    match result {
        Ok(replies) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "summary": format_replies(&replies),
            "replies": replies,
        })),
        Err(OrchestrationError::ExecutionLog { failures, replies }) => {
            log::error!(
                "Coaching run for user {} lost {} execution record(s)",
                user_id,
                failures.len()
            );
            let failed_logs: Vec<_> = failures
                .iter()
                .map(|f| serde_json::json!({
                    "agent": f.agent,
                    "success": f.success,
                    "error": f.source.to_string(),
                }))
                .collect();
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Failed to record agent executions",
                "failed_logs": failed_logs,
                "summary": format_replies(&replies),
                "replies": replies,
            }))
        }
        Err(e) => {
            log::error!("Coaching run for user {} failed: {}", user_id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Coaching failed: {}", e)
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coaching::store::CoachingStore;
    use crate::coaching::Orchestrator;
    use crate::controllers::test_support::{app_state, bearer, registry, StubAgent};
    use crate::db::Database;
    use crate::models::{ExecutionLogRecord, NewExecutionLog};
    use actix_web::{test, App};
    use rusqlite::Result as SqliteResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Store whose Nth execution record write fails
    struct FlakyLogStore {
        db: Arc<Database>,
        fail_on: usize,
        writes: AtomicUsize,
    }

    impl CoachingStore for FlakyLogStore {
        fn get_assignments(&self, user_id: i64) -> SqliteResult<Vec<String>> {
            self.db.get_assignments(user_id)
        }

        fn get_active_agent_names(&self, user_id: i64) -> SqliteResult<Vec<String>> {
            self.db.get_active_agent_names(user_id)
        }

        fn is_agent_active(&self, user_id: i64, domain: &str) -> SqliteResult<bool> {
            self.db.is_agent_active(user_id, domain)
        }

        fn append_execution_log(&self, entry: &NewExecutionLog) -> SqliteResult<ExecutionLogRecord> {
            if self.writes.fetch_add(1, Ordering::SeqCst) + 1 == self.fail_on {
                return Err(rusqlite::Error::InvalidQuery);
            }
            self.db.log_agent_execution(entry)
        }
    }

    #[actix_web::test]
    async fn test_coach_returns_successful_replies() {
        let state = app_state(vec![
            StubAgent { name: "career", reply: Some("career reply") },
            StubAgent { name: "finance", reply: None },
        ]);
        state.db.add_assignment(1, "career").unwrap();
        state.db.add_assignment(1, "finance").unwrap();
        let db = state.db.clone();

        let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/api/users/1/coach")
            .insert_header(bearer())
            .set_json(serde_json::json!({"prompt": "should I switch jobs?"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["replies"], serde_json::json!([{"agent": "career", "response": "career reply"}]));
        assert_eq!(body["summary"], "**Career Coach**\ncareer reply");
        assert_eq!(db.count_execution_logs(1).unwrap(), 2);
    }

    #[actix_web::test]
    async fn test_coach_requires_token() {
        let state = app_state(vec![]);
        let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/api/users/1/coach")
            .set_json(serde_json::json!({"prompt": "hi"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_coach_rejects_empty_prompt() {
        let state = app_state(vec![]);
        let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/api/users/1/coach")
            .insert_header(bearer())
            .set_json(serde_json::json!({"prompt": "  "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_coach_reports_replies_when_a_record_is_lost() {
        let mut state = app_state(vec![]);
        for domain in ["career", "finance", "health"] {
            state.db.add_assignment(1, domain).unwrap();
        }
        let store = Arc::new(FlakyLogStore {
            db: state.db.clone(),
            fail_on: 2,
            writes: AtomicUsize::new(0),
        });
        state.orchestrator = Arc::new(Orchestrator::new(
            store,
            registry(vec![
                StubAgent { name: "career", reply: Some("career reply") },
                StubAgent { name: "finance", reply: Some("finance reply") },
                StubAgent { name: "health", reply: Some("health reply") },
            ]),
            Duration::from_secs(5),
        ));
        let db = state.db.clone();

        let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(config)).await;
        let req = test::TestRequest::post()
            .uri("/api/users/1/coach")
            .insert_header(bearer())
            .set_json(serde_json::json!({"prompt": "help"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(
            body["replies"],
            serde_json::json!([
                {"agent": "career", "response": "career reply"},
                {"agent": "finance", "response": "finance reply"},
                {"agent": "health", "response": "health reply"},
            ])
        );
        assert_eq!(body["failed_logs"][0]["agent"], "finance");
        assert_eq!(body["failed_logs"][0]["success"], true);
        assert_eq!(body["failed_logs"].as_array().unwrap().len(), 1);
        // career and health were still recorded
        assert_eq!(db.count_execution_logs(1).unwrap(), 2);
    }
}
