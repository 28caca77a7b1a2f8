mod auth;
mod games;
mod health;
mod images;
mod profile;
mod ratings;
mod reviews;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `POST /register`, `POST /login` — token issuance
/// - `/games`, `/ratings`, `/reviews`, `/images` — resource handlers
/// - `GET /profile` — authenticated user identity
/// - `GET /health` — health check with database connectivity
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(health::router())
        .merge(profile::router())
        .nest("/games", games::router())
        .nest("/ratings", ratings::router())
        .nest("/reviews", reviews::router())
        .nest("/images", images::router())
}
