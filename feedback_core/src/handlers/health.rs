//! Health probe and submission statistics

use crate::{models::request::ApiResponse, AppState};
use axum::{extract::State, response::IntoResponse, Json};

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(serde_json::json!({
        "status": "healthy",
        "app": state.app_name,
        "version": state.version,
        "timestamp": chrono::Utc::now().timestamp(),
        "uptime_seconds": state.metrics.uptime_seconds(),
    })))
}

pub async fn handle_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(state.metrics.snapshot()))
}
