use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::auth::{jwt, password};
use crate::entities::user;
use crate::error::AppError;
use crate::extract::ValidJson;
use crate::state::AppState;

/// Build the auth route group: `/register` and `/login`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /register` — Create an account and return a bearer token.
async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    password::validate_username(&req.username).map_err(AppError::BadRequest)?;
    password::validate_email(&req.email).map_err(AppError::BadRequest)?;
    password::validate_password(&req.password).map_err(AppError::BadRequest)?;

    let existing = user::Entity::find()
        .filter(
            user::Column::Username
                .eq(&req.username)
                .or(user::Column::Email.eq(&req.email)),
        )
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest(
            "A user with that username or email already exists.".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let new_user = user::ActiveModel {
        username: Set(req.username),
        email: Set(req.email),
        password_hash: Set(password_hash),
        first_name: Set(req.first_name),
        last_name: Set(req.last_name),
        address: Set(req.address),
        phone_number: Set(req.phone_number),
        bio: Set(req.bio),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    };

    let created = new_user.insert(&state.db).await?;

    tracing::info!(user_id = created.id, "Registered new user");

    let token = jwt::generate_token(created.id, &state.config)?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// `POST /login` — Exchange credentials for a bearer token.
async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_model = user::Entity::find()
        .filter(user::Column::Username.eq(&req.username))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials.".to_string()))?;

    let valid = password::verify_password(&req.password, &user_model.password_hash)?;
    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials.".to_string()));
    }

    let token = jwt::generate_token(user_model.id, &state.config)?;

    Ok(Json(TokenResponse { token }))
}
