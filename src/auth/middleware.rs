use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use sea_orm::EntityTrait;

use crate::auth::jwt;
use crate::entities::user;
use crate::error::AppError;
use crate::state::AppState;

/// Extractor that resolves the request's bearer token to a user row.
///
/// Adding `AuthUser(user)` to a handler's parameters makes the endpoint
/// require authentication; unauthenticated requests are rejected with a 401
/// before the handler body runs. Clients send `Authorization: Token <jwt>`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Token "))
            .ok_or_else(|| AppError::Unauthorized("Authentication required.".to_string()))?;

        let claims = jwt::validate_token(token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token.".to_string()))?;

        let user_id = claims
            .sub
            .parse::<i32>()
            .map_err(|_| AppError::Unauthorized("Invalid token subject.".to_string()))?;

        user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("Unknown user.".to_string()))
    }
}
