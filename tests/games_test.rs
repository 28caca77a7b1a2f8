mod common;

use axum::http::StatusCode;
use axum::Router;
use serde_json::json;

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn clue_payload() -> serde_json::Value {
    json!({
        "categories": [1],
        "releaseYear": 1995,
        "gameDuration": 60,
        "ageRange": 60,
        "description": "some generic description",
        "title": "Clue",
        "designer": "Milton Bradley",
        "numberOfPlayers": 6,
    })
}

/// Create the "Clue" game and return its id.
async fn create_clue(app: &Router, token: &str) -> i64 {
    let (status, body) = common::post_json_with_auth(app, "/games", &clue_payload(), token).await;
    assert_eq!(status, StatusCode::CREATED, "create game failed: {body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    v["id"].as_i64().unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// Create
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_game_success() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;

    let (status, body) = common::post_json_with_auth(&app, "/games", &clue_payload(), &token).await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["title"], "Clue");
    assert_eq!(v["designer"], "Milton Bradley");
    assert_eq!(v["game_duration"], 60);
    assert_eq!(v["age_range"], 60);
    assert_eq!(v["description"], "some generic description");
    assert_eq!(v["release_year"], 1995);
    assert_eq!(v["number_of_player"], 6);
    assert_eq!(v["categories"], json!([{"id": 1, "label": "Board game"}]));
    assert_eq!(v["average_rating"], 0.0);
}

#[tokio::test]
async fn create_game_unauthenticated() {
    let (app, _db) = common::test_app().await;

    let (status, _) = common::post_json(&app, "/games", &clue_payload()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_game_unknown_category() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;

    let mut payload = clue_payload();
    payload["categories"] = json!([999]);
    let (status, body) = common::post_json_with_auth(&app, "/games", &payload, &token).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn create_game_title_too_long() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;

    let mut payload = clue_payload();
    payload["title"] = json!("x".repeat(51));
    let (status, body) = common::post_json_with_auth(&app, "/games", &payload, &token).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn create_game_missing_field() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;

    // No title key at all: must surface as a 400, not a 500
    let (status, body) = common::post_json_with_auth(
        &app,
        "/games",
        &json!({
            "categories": [1],
            "releaseYear": 1995,
            "gameDuration": 60,
            "ageRange": 60,
            "description": "some generic description",
            "designer": "Milton Bradley",
            "numberOfPlayers": 6,
        }),
        &token,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn create_game_repeated_category_ids_collapse() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;

    let mut payload = clue_payload();
    payload["categories"] = json!([1, 1]);
    let (status, body) = common::post_json_with_auth(&app, "/games", &payload, &token).await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["categories"], json!([{"id": 1, "label": "Board game"}]));
}

// ─────────────────────────────────────────────────────────────────────────────
// Retrieve
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_game_round_trip() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;
    let id = create_clue(&app, &token).await;

    let (status, body) = common::get(&app, &format!("/games/{id}")).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["title"], "Clue");
    assert_eq!(v["designer"], "Milton Bradley");
    assert_eq!(v["game_duration"], 60);
    assert_eq!(v["age_range"], 60);
    assert_eq!(v["description"], "some generic description");
    assert_eq!(v["release_year"], 1995);
    assert_eq!(v["number_of_player"], 6);
    assert_eq!(v["categories"], json!([{"id": 1, "label": "Board game"}]));
}

#[tokio::test]
async fn get_game_not_found() {
    let (app, _db) = common::test_app().await;

    let (status, _) = common::get(&app, "/games/42").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─────────────────────────────────────────────────────────────────────────────
// Update
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_game_replaces_fields_and_categories() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;
    let id = create_clue(&app, &token).await;

    let (status, body) = common::put_json_with_auth(
        &app,
        &format!("/games/{id}"),
        &json!({
            "categories": [2],
            "releaseYear": 1990,
            "gameDuration": 90,
            "ageRange": 12,
            "description": "some generic Monopoly description",
            "title": "Monopoly",
            "designer": "Milton Bradley",
            "numberOfPlayers": 8,
        }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT, "{body}");
    assert!(body.is_empty());

    let (status, body) = common::get(&app, &format!("/games/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["title"], "Monopoly");
    assert_eq!(v["release_year"], 1990);
    assert_eq!(v["game_duration"], 90);
    assert_eq!(v["number_of_player"], 8);
    assert_eq!(v["description"], "some generic Monopoly description");
    // Old category set is fully replaced
    assert_eq!(v["categories"], json!([{"id": 2, "label": "Card game"}]));
}

#[tokio::test]
async fn update_game_not_found() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;

    let (status, _) =
        common::put_json_with_auth(&app, "/games/42", &clue_payload(), &token).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─────────────────────────────────────────────────────────────────────────────
// Delete
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_game_then_404() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;
    let id = create_clue(&app, &token).await;

    let (status, _) = common::delete_with_auth(&app, &format!("/games/{id}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = common::get(&app, &format!("/games/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting twice is safe: the second call reports 404, it does not crash
    let (status, _) = common::delete_with_auth(&app, &format!("/games/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_game_cascades_to_dependents() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;
    let id = create_clue(&app, &token).await;

    let (status, _) = common::post_json_with_auth(
        &app,
        "/ratings",
        &json!({ "gameId": id, "rating": 10 }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = common::post_json_with_auth(
        &app,
        "/reviews",
        &json!({ "gameId": id, "review": "generic review" }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = common::delete_with_auth(&app, &format!("/games/{id}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = common::get(&app, &format!("/ratings?game={id}")).await;
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v.as_array().map(Vec::len), Some(0));

    let (_, body) = common::get(&app, &format!("/reviews?game={id}")).await;
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v.as_array().map(Vec::len), Some(0));
}

// ─────────────────────────────────────────────────────────────────────────────
// List / Search
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_games() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;
    create_clue(&app, &token).await;

    let mut second = clue_payload();
    second["title"] = json!("Monopoly");
    let (status, _) = common::post_json_with_auth(&app, "/games", &second, &token).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::get(&app, "/games").await;
    assert_eq!(status, StatusCode::OK);
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn search_games_by_title_substring() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;
    create_clue(&app, &token).await;

    let mut second = clue_payload();
    second["title"] = json!("Monopoly");
    let (status, _) = common::post_json_with_auth(&app, "/games", &second, &token).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::get(&app, "/games?q=Mono").await;
    assert_eq!(status, StatusCode::OK);
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v.as_array().map(Vec::len), Some(1));
    assert_eq!(v[0]["title"], "Monopoly");

    // Substring match is case-sensitive
    let (_, body) = common::get(&app, "/games?q=mono").await;
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v.as_array().map(Vec::len), Some(0));
}

// ─────────────────────────────────────────────────────────────────────────────
// Average rating
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn average_rating_mean_of_ratings() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;
    let id = create_clue(&app, &token).await;

    let (status, _) = common::post_json_with_auth(
        &app,
        "/ratings",
        &json!({ "gameId": id, "rating": 10 }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = common::get(&app, &format!("/games/{id}")).await;
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["average_rating"], 10.0);
}

#[tokio::test]
async fn average_rating_zero_without_ratings() {
    let (app, _db) = common::test_app().await;
    let token = common::register_and_get_token(&app, "steve").await;
    let id = create_clue(&app, &token).await;

    let (_, body) = common::get(&app, &format!("/games/{id}")).await;
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(v["average_rating"], 0.0);
}
