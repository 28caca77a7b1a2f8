use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthUser;
use crate::entities::{category, game, game_category, image, rating, review};
use crate::error::AppError;
use crate::extract::ValidJson;
use crate::state::AppState;

/// Game resource router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_game).get(list_games))
        .route(
            "/{id}",
            get(get_game).put(update_game).delete(delete_game),
        )
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Shared body for `POST /games` and `PUT /games/:id` (full overwrite).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameRequest {
    title: String,
    description: String,
    designer: String,
    number_of_players: i32,
    release_year: i32,
    game_duration: i32,
    age_range: i32,
    categories: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

/// Wire shape of a game, matching the original client contract (snake_case,
/// categories expanded one level deep).
#[derive(Debug, Serialize)]
struct GameResponse {
    id: i32,
    title: String,
    description: String,
    number_of_player: i32,
    designer: String,
    age_range: i32,
    release_year: i32,
    game_duration: i32,
    categories: Vec<CategoryResponse>,
    average_rating: f64,
}

#[derive(Debug, Serialize)]
struct CategoryResponse {
    id: i32,
    label: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// `POST /games` — Create a new game owned by the authenticated user.
async fn create_game(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(req): ValidJson<GameRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_fields(&req)?;

    let txn = state.db.begin().await?;

    let new_game = game::ActiveModel {
        user_id: ActiveValue::Set(user.id),
        title: ActiveValue::Set(req.title),
        description: ActiveValue::Set(req.description),
        designer: ActiveValue::Set(req.designer),
        number_of_player: ActiveValue::Set(req.number_of_players),
        release_year: ActiveValue::Set(req.release_year),
        game_duration: ActiveValue::Set(req.game_duration),
        age_range: ActiveValue::Set(req.age_range),
        ..Default::default()
    };

    let created = new_game.insert(&txn).await?;
    set_categories(&txn, created.id, &req.categories).await?;

    txn.commit().await?;

    let response = build_game_response(&state.db, created).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /games/:id` — Get a single game.
async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let found = find_game(&state.db, id).await?;
    let response = build_game_response(&state.db, found).await?;
    Ok(Json(response))
}

/// `PUT /games/:id` — Overwrite a game's editable fields and category set.
async fn update_game(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
    ValidJson(req): ValidJson<GameRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_fields(&req)?;

    let found = find_game(&state.db, id).await?;

    let txn = state.db.begin().await?;

    // Ownership is intentionally left as-is; the creator stays the creator.
    let mut active: game::ActiveModel = found.into();
    active.title = ActiveValue::Set(req.title);
    active.description = ActiveValue::Set(req.description);
    active.designer = ActiveValue::Set(req.designer);
    active.number_of_player = ActiveValue::Set(req.number_of_players);
    active.release_year = ActiveValue::Set(req.release_year);
    active.game_duration = ActiveValue::Set(req.game_duration);
    active.age_range = ActiveValue::Set(req.age_range);
    let updated = active.update(&txn).await?;

    set_categories(&txn, updated.id, &req.categories).await?;

    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /games/:id` — Delete a game and all dependent rows.
async fn delete_game(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let found = find_game(&state.db, id).await?;

    // Collect stored image paths before the rows disappear
    let images = image::Entity::find()
        .filter(image::Column::GameId.eq(id))
        .all(&state.db)
        .await?;

    let txn = state.db.begin().await?;

    game_category::Entity::delete_many()
        .filter(game_category::Column::GameId.eq(id))
        .exec(&txn)
        .await?;
    rating::Entity::delete_many()
        .filter(rating::Column::GameId.eq(id))
        .exec(&txn)
        .await?;
    review::Entity::delete_many()
        .filter(review::Column::GameId.eq(id))
        .exec(&txn)
        .await?;
    image::Entity::delete_many()
        .filter(image::Column::GameId.eq(id))
        .exec(&txn)
        .await?;

    let active: game::ActiveModel = found.into();
    active.delete(&txn).await?;

    txn.commit().await?;

    // Best-effort file cleanup; a missing file is not an error
    for img in images {
        if tokio::fs::remove_file(&img.image).await.is_err() {
            tracing::warn!(path = %img.image, "Could not remove stored image file");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /games` — List all games, optionally filtered by `?q=<text>`.
///
/// The search is a case-sensitive substring match on the title. SQLite's
/// `LIKE` is case-insensitive for ASCII, so the match runs in-process to
/// behave the same on every backend.
async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut games = game::Entity::find()
        .order_by_asc(game::Column::Id)
        .all(&state.db)
        .await?;

    if let Some(text) = query.q {
        games.retain(|g| g.title.contains(&text));
    }

    let mut responses = Vec::with_capacity(games.len());
    for g in games {
        responses.push(build_game_response(&state.db, g).await?);
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

fn validate_fields(req: &GameRequest) -> Result<(), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    if req.title.len() > 50 {
        return Err(AppError::BadRequest(
            "Title must be at most 50 characters".to_string(),
        ));
    }
    if req.description.len() > 150 {
        return Err(AppError::BadRequest(
            "Description must be at most 150 characters".to_string(),
        ));
    }
    if req.designer.len() > 50 {
        return Err(AppError::BadRequest(
            "Designer must be at most 50 characters".to_string(),
        ));
    }
    Ok(())
}

/// Replace a game's category set ("set" semantics, not "add").
///
/// Repeated ids collapse to one link. All submitted ids must resolve to
/// existing categories, otherwise the whole request fails with a 400.
async fn set_categories<C: ConnectionTrait>(
    db: &C,
    game_id: i32,
    category_ids: &[i32],
) -> Result<(), AppError> {
    let mut ids = category_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let found = category::Entity::find()
        .filter(category::Column::Id.is_in(ids.clone()))
        .all(db)
        .await?;

    if found.len() != ids.len() {
        return Err(AppError::BadRequest(
            "One or more category ids do not exist".to_string(),
        ));
    }

    game_category::Entity::delete_many()
        .filter(game_category::Column::GameId.eq(game_id))
        .exec(db)
        .await?;

    for category_id in ids {
        game_category::ActiveModel {
            game_id: ActiveValue::Set(game_id),
            category_id: ActiveValue::Set(category_id),
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

/// Load the expanded `{id, label}` categories of a game in stored order.
async fn load_categories(
    db: &DatabaseConnection,
    game_id: i32,
) -> Result<Vec<CategoryResponse>, AppError> {
    let links = game_category::Entity::find()
        .filter(game_category::Column::GameId.eq(game_id))
        .order_by_asc(game_category::Column::CategoryId)
        .all(db)
        .await?;

    if links.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = links.iter().map(|link| link.category_id).collect();
    let categories = category::Entity::find()
        .filter(category::Column::Id.is_in(ids))
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?;

    Ok(categories
        .into_iter()
        .map(|c| CategoryResponse {
            id: c.id,
            label: c.label,
        })
        .collect())
}

/// Arithmetic mean of a game's ratings; `0` when the game has none.
async fn average_rating(db: &DatabaseConnection, game_id: i32) -> Result<f64, AppError> {
    let ratings = rating::Entity::find()
        .filter(rating::Column::GameId.eq(game_id))
        .all(db)
        .await?;

    if ratings.is_empty() {
        return Ok(0.0);
    }

    let sum: i64 = ratings.iter().map(|r| i64::from(r.rating)).sum();

    #[allow(clippy::cast_precision_loss)]
    let mean = sum as f64 / ratings.len() as f64;
    Ok(mean)
}

async fn build_game_response(
    db: &DatabaseConnection,
    model: game::Model,
) -> Result<GameResponse, AppError> {
    let categories = load_categories(db, model.id).await?;
    let average = average_rating(db, model.id).await?;

    Ok(GameResponse {
        id: model.id,
        title: model.title,
        description: model.description,
        number_of_player: model.number_of_player,
        designer: model.designer,
        age_range: model.age_range,
        release_year: model.release_year,
        game_duration: model.game_duration,
        categories,
        average_rating: average,
    })
}
