use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::{game, image, user};
use crate::error::AppError;
use crate::extract::ValidJson;
use crate::state::AppState;

/// Image resource router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_image).get(list_images))
        .route(
            "/{id}",
            get(get_image).put(update_image).delete(delete_image),
        )
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageRequest {
    game_id: i32,
    /// Data URI of the form `<mime-type>;base64,<payload>`.
    image: String,
}

#[derive(Debug, Deserialize)]
struct GameFilterQuery {
    game: Option<i32>,
}

#[derive(Debug, Serialize)]
struct ImageResponse {
    id: i32,
    user: UploaderInfo,
    game: GameInfo,
    image: String,
}

#[derive(Debug, Serialize)]
struct UploaderInfo {
    id: i32,
    first_name: String,
    last_name: String,
    username: String,
}

#[derive(Debug, Serialize)]
struct GameInfo {
    id: i32,
    title: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// `POST /images` — Decode a base64 data URI and store it as a game photo.
async fn create_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(req): ValidJson<ImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let photographed_game = find_game(&state.db, req.game_id).await?;

    let path = store_data_uri(&state, req.game_id, &req.image).await?;

    let created = image::ActiveModel {
        game_id: ActiveValue::Set(req.game_id),
        user_id: ActiveValue::Set(user.id),
        image: ActiveValue::Set(path),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    let response = ImageResponse {
        id: created.id,
        user: uploader_info(&user),
        game: GameInfo {
            id: photographed_game.id,
            title: photographed_game.title,
        },
        image: created.image,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /images/:id` — Get a single image record.
async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let found = find_image(&state.db, id).await?;
    let response = build_image_response(&state.db, found).await?;
    Ok(Json(response))
}

/// `PUT /images/:id` — Replace an image record's game, uploader, and file.
async fn update_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    ValidJson(req): ValidJson<ImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let found = find_image(&state.db, id).await?;
    find_game(&state.db, req.game_id).await?;

    // The replacement payload is decoded exactly like on create
    let path = store_data_uri(&state, req.game_id, &req.image).await?;
    let old_path = found.image.clone();

    let mut active: image::ActiveModel = found.into();
    active.game_id = ActiveValue::Set(req.game_id);
    active.user_id = ActiveValue::Set(user.id);
    active.image = ActiveValue::Set(path);
    active.update(&state.db).await?;

    remove_stored_file(&old_path).await;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /images/:id` — Delete an image record and its stored file.
async fn delete_image(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let found = find_image(&state.db, id).await?;
    let path = found.image.clone();

    let active: image::ActiveModel = found.into();
    active.delete(&state.db).await?;

    remove_stored_file(&path).await;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /images` — List all images, optionally filtered by `?game=<id>`.
async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<GameFilterQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut find = image::Entity::find().order_by_asc(image::Column::Id);
    if let Some(game_id) = query.game {
        find = find.filter(image::Column::GameId.eq(game_id));
    }

    let images = find.all(&state.db).await?;

    let mut responses = Vec::with_capacity(images.len());
    for i in images {
        responses.push(build_image_response(&state.db, i).await?);
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

async fn find_image(db: &DatabaseConnection, id: i32) -> Result<image::Model, AppError> {
    image::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))
}

/// Decode a `<mime>;base64,<payload>` data URI and write the bytes to the
/// upload directory as `<gameId>-<random token>.<ext>`. Returns the stored path.
async fn store_data_uri(
    state: &AppState,
    game_id: i32,
    data_uri: &str,
) -> Result<String, AppError> {
    let (mime, payload) = data_uri.split_once(";base64,").ok_or_else(|| {
        AppError::BadRequest("Image must be a base64-encoded data URI".to_string())
    })?;

    // Extension comes from the mime subtype: "data:image/png" -> "png"
    let ext = mime
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && s.chars().all(char::is_alphanumeric))
        .ok_or_else(|| AppError::BadRequest("Unrecognized image mime type".to_string()))?;

    let bytes = BASE64
        .decode(payload)
        .map_err(|_| AppError::BadRequest("Image payload is not valid base64".to_string()))?;

    let file_name = format!("{game_id}-{}.{ext}", Uuid::new_v4());
    let dir = std::path::Path::new(&state.config.upload_dir);
    let path = dir.join(file_name);

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, bytes).await?;

    Ok(path.to_string_lossy().into_owned())
}

/// Best-effort removal of a stored file; a missing file is not an error.
async fn remove_stored_file(path: &str) {
    if tokio::fs::remove_file(path).await.is_err() {
        tracing::warn!(%path, "Could not remove stored image file");
    }
}

fn uploader_info(u: &user::Model) -> UploaderInfo {
    UploaderInfo {
        id: u.id,
        first_name: u.first_name.clone(),
        last_name: u.last_name.clone(),
        username: u.username.clone(),
    }
}

/// Expand an image row to its wire shape (user and game one level deep).
async fn build_image_response(
    db: &DatabaseConnection,
    model: image::Model,
) -> Result<ImageResponse, AppError> {
    let uploader = user::Entity::find_by_id(model.user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let photographed_game = find_game(db, model.game_id).await?;

    Ok(ImageResponse {
        id: model.id,
        user: uploader_info(&uploader),
        game: GameInfo {
            id: photographed_game.id,
            title: photographed_game.title,
        },
        image: model.image,
    })
}
