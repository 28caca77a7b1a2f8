use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    database: String,
}

/// Health check endpoint handler
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_status = match state.db.ping().await {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status.to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Register health check routes
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
