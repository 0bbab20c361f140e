//! Shared helpers for database-backed API tests.
//!
//! Builds the same router/middleware stack the binary uses, against a
//! sqlx-provisioned test database, plus small request/response helpers.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use slotswap_api::auth::jwt::{generate_access_token, JwtConfig};
use slotswap_api::config::ServerConfig;
use slotswap_api::engine::NegotiationEngine;
use slotswap_api::router::build_app_router;
use slotswap_api::state::AppState;
use slotswap_api::ws::WsRegistry;
use slotswap_core::types::DbId;
use slotswap_events::EventBus;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_hours: 1,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Mirrors the wiring in `main.rs` so tests exercise
/// the production stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let ws_registry = Arc::new(WsRegistry::new());
    let event_bus = Arc::new(EventBus::default());
    let engine = NegotiationEngine::new(pool.clone(), Arc::clone(&event_bus));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_registry,
        event_bus,
        engine,
    };

    build_app_router(state, &config)
}

/// Mint a valid access token for the given user id.
pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Response {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"));

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    };

    app.oneshot(request).await.expect("request should complete")
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, "GET", uri, token, None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, "POST", uri, token, Some(body)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, "PUT", uri, token, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
