/*
 * Responsibility
 * - GET /api/health (liveness)
 * - Public: works with or without credentials
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
