use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Profile router.
pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

#[derive(Serialize)]
struct ProfileResponse {
    user: ProfileUser,
}

#[derive(Serialize)]
struct ProfileUser {
    id: i32,
}

/// `GET /profile` — Identity of the authenticated user.
async fn get_profile(AuthUser(user): AuthUser) -> Result<impl IntoResponse, AppError> {
    Ok(Json(ProfileResponse {
        user: ProfileUser { id: user.id },
    }))
}
