// handlers/service.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::middleware::ApiResponse;
use crate::state::AppState;

pub async fn root_get() -> impl IntoResponse {
    ApiResponse::new(
        "Taskfeed API",
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "public": "/api/auth/{register,login,forgot-password,security-answer,reset-password}, /api/users/:userId[/followers|/following]",
                "protected": "/api/auth/{details,password,security-qa,whoami}, /api/users/:userId/{blocked,follow,block}, /api/posts, /api/tasks, /api/subtasks, /api/comments",
            }
        }),
    )
}

pub async fn health_get(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => ApiResponse::new("ok", json!({ "status": "ok", "timestamp": now, "database": "ok" }))
            .into_response(),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "message": "database unavailable",
                    "data": { "status": "degraded", "timestamp": now },
                    "ok": false,
                })),
            )
                .into_response()
        }
    }
}
