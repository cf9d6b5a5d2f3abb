//! Route table for the feedback service

use crate::{
    handlers::{feedback, health},
    models::{request::ApiResponse, FEEDBACK_PATH},
    AppState,
};
use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(feedback::handle_form_page))
        .route(FEEDBACK_PATH, post(feedback::handle_feedback))
        .route("/health", get(health::handle_health))
        .route("/api/stats", get(health::handle_stats))
        .fallback(handle_not_found)
}

async fn handle_not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error(format!("No route for {}", uri.path()))),
    )
}
