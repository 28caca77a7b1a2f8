// Shared helpers for the integration test binaries; not every binary uses
// every helper.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use gamerater_api::config::{Config, Environment};
use gamerater_api::state::AppState;

/// Build an app backed by a fresh in-memory SQLite database with all
/// migrations (including the category seed) applied.
pub async fn test_app() -> (Router, DatabaseConnection) {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .unwrap_or_default();
    Migrator::up(&db, None).await.unwrap_or_default();

    let upload_dir = std::env::temp_dir()
        .join("gamerater-test-uploads")
        .to_string_lossy()
        .into_owned();

    let state = AppState {
        db: db.clone(),
        config: Config {
            database_url: String::new(),
            server_host: std::net::IpAddr::from([127, 0, 0, 1]),
            server_port: 0,
            environment: Environment::Development,
            log_level: "warn".to_string(),
            jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
            jwt_expiration_secs: 900,
            upload_dir,
            frontend_url: "http://localhost:3000".to_string(),
        },
    };

    (gamerater_api::routes::router().with_state(state), db)
}

/// Register a fresh user and return the bearer token.
pub async fn register_and_get_token(app: &Router, username: &str) -> String {
    let (status, body) = post_json(
        app,
        "/register",
        &serde_json::json!({
            "username": username,
            "password": "Admin8*",
            "email": format!("{username}@example.com"),
            "first_name": "Steve",
            "last_name": "Brownlee",
            "address": "100 Infinity Way",
            "phone_number": "555-1212",
            "bio": "Love those gamez!!"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let v: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    v["token"].as_str().unwrap_or_default().to_string()
}

/// Send a request with an optional JSON body and `Authorization: Token` header.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
    token: Option<&str>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Token {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap_or_default();

    let response = app.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let body_str = String::from_utf8(bytes.to_vec()).unwrap_or_default();

    (status, body_str)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    send(app, "GET", uri, None, None).await
}

pub async fn get_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    send(app, "GET", uri, None, Some(token)).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    json: &serde_json::Value,
) -> (StatusCode, String) {
    send(app, "POST", uri, Some(json), None).await
}

pub async fn post_json_with_auth(
    app: &Router,
    uri: &str,
    json: &serde_json::Value,
    token: &str,
) -> (StatusCode, String) {
    send(app, "POST", uri, Some(json), Some(token)).await
}

pub async fn put_json_with_auth(
    app: &Router,
    uri: &str,
    json: &serde_json::Value,
    token: &str,
) -> (StatusCode, String) {
    send(app, "PUT", uri, Some(json), Some(token)).await
}

pub async fn delete_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, String) {
    send(app, "DELETE", uri, None, Some(token)).await
}
