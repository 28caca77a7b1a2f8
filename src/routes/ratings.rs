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
use crate::entities::{game, rating, user};
use crate::error::AppError;
use crate::extract::ValidJson;
use crate::state::AppState;

/// Rating resource router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_rating).get(list_ratings))
        .route(
            "/{id}",
            get(get_rating).put(update_rating).delete(delete_rating),
        )
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingRequest {
    game_id: i32,
    rating: i32,
}

#[derive(Debug, Deserialize)]
struct GameFilterQuery {
    game: Option<i32>,
}

#[derive(Debug, Serialize)]
struct RatingResponse {
    id: i32,
    user: RaterInfo,
    game: GameInfo,
    rating: i32,
}

#[derive(Debug, Serialize)]
struct RaterInfo {
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

/// `POST /ratings` — Rate a game as the authenticated user.
async fn create_rating(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(req): ValidJson<RatingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let rated_game = find_game(&state.db, req.game_id).await?;

    let existing = rating::Entity::find()
        .filter(rating::Column::GameId.eq(req.game_id))
        .filter(rating::Column::UserId.eq(user.id))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest(
            "You have already rated this game".to_string(),
        ));
    }

    let created = rating::ActiveModel {
        game_id: ActiveValue::Set(req.game_id),
        user_id: ActiveValue::Set(user.id),
        rating: ActiveValue::Set(req.rating),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    let response = RatingResponse {
        id: created.id,
        user: rater_info(&user),
        game: GameInfo {
            title: rated_game.title,
        },
        rating: created.rating,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /ratings/:id` — Get a single rating.
async fn get_rating(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let found = find_rating(&state.db, id).await?;
    let response = build_rating_response(&state.db, found).await?;
    Ok(Json(response))
}

/// `PUT /ratings/:id` — Update the rating row in place.
///
/// The row keeps its original author; reassigning it to the caller could
/// collide with the caller's own rating of the same game.
async fn update_rating(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
    ValidJson(req): ValidJson<RatingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let found = find_rating(&state.db, id).await?;
    find_game(&state.db, req.game_id).await?;

    let mut active: rating::ActiveModel = found.into();
    active.game_id = ActiveValue::Set(req.game_id);
    active.rating = ActiveValue::Set(req.rating);
    active.update(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /ratings/:id` — Delete a rating.
async fn delete_rating(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let found = find_rating(&state.db, id).await?;

    let active: rating::ActiveModel = found.into();
    active.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /ratings` — List all ratings, optionally filtered by `?game=<id>`.
async fn list_ratings(
    State(state): State<AppState>,
    Query(query): Query<GameFilterQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut find = rating::Entity::find().order_by_asc(rating::Column::Id);
    if let Some(game_id) = query.game {
        find = find.filter(rating::Column::GameId.eq(game_id));
    }

    let ratings = find.all(&state.db).await?;

    let mut responses = Vec::with_capacity(ratings.len());
    for r in ratings {
        responses.push(build_rating_response(&state.db, r).await?);
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

async fn find_rating(db: &DatabaseConnection, id: i32) -> Result<rating::Model, AppError> {
    rating::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Rating not found".to_string()))
}

fn rater_info(u: &user::Model) -> RaterInfo {
    RaterInfo {
        first_name: u.first_name.clone(),
        last_name: u.last_name.clone(),
        username: u.username.clone(),
    }
}

/// Expand a rating row to its wire shape (user and game one level deep).
async fn build_rating_response(
    db: &DatabaseConnection,
    model: rating::Model,
) -> Result<RatingResponse, AppError> {
    let rater = user::Entity::find_by_id(model.user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let rated_game = find_game(db, model.game_id).await?;

    Ok(RatingResponse {
        id: model.id,
        user: rater_info(&rater),
        game: GameInfo {
            title: rated_game.title,
        },
        rating: model.rating,
    })
}
