use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Application error, rendered as `{ "message": "..." }` with the matching
/// status code.
///
/// Handlers return the first three variants deliberately; everything else
/// funnels into `Internal` through `?`, which logs the chain and hides the
/// detail from the client.
pub enum AppError {
    /// 400: the request payload failed validation.
    BadRequest(String),
    /// 401: no token, a malformed header, or an expired token.
    Unauthorized(String),
    /// 404: the addressed row does not exist.
    NotFound(String),
    /// 500: database failures, I/O failures, and other surprises.
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(err) => {
                tracing::error!("Request failed: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
