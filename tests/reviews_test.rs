mod common;

use axum::http::StatusCode;
use axum::Router;
use serde_json::json;

/// Register, create the "Clue" game, and return (token, game id).
async fn setup_game(app: &Router) -> (String, i64) {
    let token = common::register_and_get_token(app, "steve").await;
    let (status, body) = common::post_json_with_auth(
        app,
        "/games",
        &json!({
            "categories": [1],
            "releaseYear": 1995,
            "gameDuration": 60,
            "ageRange": 60,
            "description": "some generic description",
            "title": "Clue",
            "designer": "Milton Bradley",
            "numberOfPlayers": 6,
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create game failed: {body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    (token, v["id"].as_i64().unwrap_or_default())
}

#[tokio::test]
async fn create_review_success() {
    let (app, _db) = common::test_app().await;
    let (token, game_id) = setup_game(&app).await;

    let (status, body) = common::post_json_with_auth(
        &app,
        "/reviews",
        &json!({ "gameId": game_id, "review": "generic review" }),
        &token,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["game"], json!({ "title": "Clue" }));
    assert_eq!(v["review"], "generic review");
    assert_eq!(v["user"]["username"], "steve");
}

#[tokio::test]
async fn create_review_unknown_game() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;

    let (status, _) = common::post_json_with_auth(
        &app,
        "/reviews",
        &json!({ "gameId": 42, "review": "generic review" }),
        &token,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_review_empty_text_rejected() {
    let (app, _db) = common::test_app().await;
    let (token, game_id) = setup_game(&app).await;

    let (status, _) = common::post_json_with_auth(
        &app,
        "/reviews",
        &json!({ "gameId": game_id, "review": "   " }),
        &token,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_review_twice_rejected() {
    let (app, _db) = common::test_app().await;
    let (token, game_id) = setup_game(&app).await;

    let (status, _) = common::post_json_with_auth(
        &app,
        "/reviews",
        &json!({ "gameId": game_id, "review": "first take" }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = common::post_json_with_auth(
        &app,
        "/reviews",
        &json!({ "gameId": game_id, "review": "second take" }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_review() {
    let (app, _db) = common::test_app().await;
    let (token, game_id) = setup_game(&app).await;

    let (_, body) = common::post_json_with_auth(
        &app,
        "/reviews",
        &json!({ "gameId": game_id, "review": "a fine deduction game" }),
        &token,
    )
    .await;
    let created: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let id = created["id"].as_i64().unwrap_or_default();

    let (status, body) = common::get(&app, &format!("/reviews/{id}")).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["review"], "a fine deduction game");
    assert_eq!(v["game"], json!({ "title": "Clue" }));
}

#[tokio::test]
async fn update_review_in_place() {
    let (app, _db) = common::test_app().await;
    let (token, game_id) = setup_game(&app).await;

    let (_, body) = common::post_json_with_auth(
        &app,
        "/reviews",
        &json!({ "gameId": game_id, "review": "first impression" }),
        &token,
    )
    .await;
    let created: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let id = created["id"].as_i64().unwrap_or_default();

    let (status, _) = common::put_json_with_auth(
        &app,
        &format!("/reviews/{id}"),
        &json!({ "gameId": game_id, "review": "revised opinion" }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = common::get(&app, &format!("/reviews/{id}")).await;
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["review"], "revised opinion");
}

#[tokio::test]
async fn update_review_keeps_original_author() {
    let (app, _db) = common::test_app().await;
    let (token, game_id) = setup_game(&app).await;

    let (_, body) = common::post_json_with_auth(
        &app,
        "/reviews",
        &json!({ "gameId": game_id, "review": "first impression" }),
        &token,
    )
    .await;
    let created: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let id = created["id"].as_i64().unwrap_or_default();

    // A second user with their own review of the same game
    let other = common::register_and_get_token(&app, "emily").await;
    let (status, _) = common::post_json_with_auth(
        &app,
        "/reviews",
        &json!({ "gameId": game_id, "review": "emily's take" }),
        &other,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Editing the first row must not hand it to the caller, whose own
    // review of this game already exists
    let (status, body) = common::put_json_with_auth(
        &app,
        &format!("/reviews/{id}"),
        &json!({ "gameId": game_id, "review": "touched up" }),
        &other,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT, "{body}");

    let (_, body) = common::get(&app, &format!("/reviews/{id}")).await;
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["review"], "touched up");
    assert_eq!(v["user"]["username"], "steve");
}

#[tokio::test]
async fn delete_review_then_404() {
    let (app, _db) = common::test_app().await;
    let (token, game_id) = setup_game(&app).await;

    let (_, body) = common::post_json_with_auth(
        &app,
        "/reviews",
        &json!({ "gameId": game_id, "review": "short lived" }),
        &token,
    )
    .await;
    let created: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let id = created["id"].as_i64().unwrap_or_default();

    let (status, _) = common::delete_with_auth(&app, &format!("/reviews/{id}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = common::get(&app, &format!("/reviews/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_reviews_filtered_by_game() {
    let (app, _db) = common::test_app().await;
    let (token, game_id) = setup_game(&app).await;

    let (status, _) = common::post_json_with_auth(
        &app,
        "/reviews",
        &json!({ "gameId": game_id, "review": "generic review" }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::get(&app, &format!("/reviews?game={game_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v.as_array().map(Vec::len), Some(1));
    assert_eq!(v[0]["review"], "generic review");

    let (_, body) = common::get(&app, "/reviews?game=999").await;
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v.as_array().map(Vec::len), Some(0));
}
