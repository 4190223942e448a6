use axum::{Json, Router, response::IntoResponse, routing::get};
use serde_json::json;

/// Liveness probe. Answers the same way for every request.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

pub fn health_router() -> Router {
    Router::new().route("/health", get(health_check))
}
