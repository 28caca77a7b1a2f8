use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthUser;
use crate::entities::{game, review, user};
use crate::error::AppError;
use crate::extract::ValidJson;
use crate::state::AppState;

/// Review resource router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_review).get(list_reviews))
        .route(
            "/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRequest {
    game_id: i32,
    review: String,
}

#[derive(Debug, Deserialize)]
struct GameFilterQuery {
    game: Option<i32>,
}

#[derive(Debug, Serialize)]
struct ReviewResponse {
    id: i32,
    user: ReviewerInfo,
    game: GameInfo,
    review: String,
}

#[derive(Debug, Serialize)]
struct ReviewerInfo {
    first_name: String,
    last_name: String,
    username: String,
}

#[derive(Debug, Serialize)]
struct GameInfo {
    title: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// `POST /reviews` — Review a game as the authenticated user.
async fn create_review(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(req): ValidJson<ReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.review.trim().is_empty() {
        return Err(AppError::BadRequest("Review text is required".to_string()));
    }

    let reviewed_game = find_game(&state.db, req.game_id).await?;

    let existing = review::Entity::find()
        .filter(review::Column::GameId.eq(req.game_id))
        .filter(review::Column::UserId.eq(user.id))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest(
            "You have already reviewed this game".to_string(),
        ));
    }

    let created = review::ActiveModel {
        game_id: ActiveValue::Set(req.game_id),
        user_id: ActiveValue::Set(user.id),
        review: ActiveValue::Set(req.review),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    let response = ReviewResponse {
        id: created.id,
        user: reviewer_info(&user),
        game: GameInfo {
            title: reviewed_game.title,
        },
        review: created.review,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /reviews/:id` — Get a single review.
async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let found = find_review(&state.db, id).await?;
    let response = build_review_response(&state.db, found).await?;
    Ok(Json(response))
}

/// `PUT /reviews/:id` — Update the review row in place.
///
/// The row keeps its original author; reassigning it to the caller could
/// collide with the caller's own review of the same game.
async fn update_review(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
    ValidJson(req): ValidJson<ReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let found = find_review(&state.db, id).await?;
    find_game(&state.db, req.game_id).await?;

    let mut active: review::ActiveModel = found.into();
    active.game_id = ActiveValue::Set(req.game_id);
    active.review = ActiveValue::Set(req.review);
    active.update(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /reviews/:id` — Delete a review.
async fn delete_review(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let found = find_review(&state.db, id).await?;

    let active: review::ActiveModel = found.into();
    active.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /reviews` — List all reviews, optionally filtered by `?game=<id>`.
async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<GameFilterQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut find = review::Entity::find().order_by_asc(review::Column::Id);
    if let Some(game_id) = query.game {
        find = find.filter(review::Column::GameId.eq(game_id));
    }

    let reviews = find.all(&state.db).await?;

    let mut responses = Vec::with_capacity(reviews.len());
    for r in reviews {
        responses.push(build_review_response(&state.db, r).await?);
    }

    Ok(Json(responses))
}

// ============================================================================
// Helpers
// ============================================================================

async fn find_game(db: &DatabaseConnection, id: i32) -> Result<game::Model, AppError> {
    game::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Game not found".to_string()))
}

async fn find_review(db: &DatabaseConnection, id: i32) -> Result<review::Model, AppError> {
    review::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".to_string()))
}

fn reviewer_info(u: &user::Model) -> ReviewerInfo {
    ReviewerInfo {
        first_name: u.first_name.clone(),
        last_name: u.last_name.clone(),
        username: u.username.clone(),
    }
}

/// Expand a review row to its wire shape (user and game one level deep).
async fn build_review_response(
    db: &DatabaseConnection,
    model: review::Model,
) -> Result<ReviewResponse, AppError> {
    let reviewer = user::Entity::find_by_id(model.user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let reviewed_game = find_game(db, model.game_id).await?;

    Ok(ReviewResponse {
        id: model.id,
        user: reviewer_info(&reviewer),
        game: GameInfo {
            title: reviewed_game.title,
        },
        review: model.review,
    })
}
