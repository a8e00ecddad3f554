//! Shared setup for router integration tests.
//!
//! Tests run the full router over the in-memory store. The price feed is
//! pointed at an unroutable endpoint so it deterministically degrades to
//! its fixed fallback price.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use coinharbor_core::AdminCredential;
use coinharbor_data::{seed_store, BitcoinPriceFeed, MemoryStore};
use coinharbor_web_api::{ApiContext, ApiServer, TokenService};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret";
pub const APPROVAL_CODE: &str = "666666";

/// Builds the router plus a handle on its store for direct assertions.
pub async fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    seed_store(store.as_ref()).await.expect("seeding failed");

    let ctx = ApiContext {
        store: store.clone(),
        price_feed: Arc::new(BitcoinPriceFeed::new("http://127.0.0.1:9".to_string(), 30)),
        tokens: TokenService::new(TEST_SECRET, 8),
        admins: Arc::new(vec![AdminCredential {
            id: 1,
            username: "admin".to_string(),
            password: "admin123".to_string(),
            name: "Platform Admin".to_string(),
        }]),
        approval_codes: Arc::new(vec![APPROVAL_CODE.to_string(); 3]),
    };

    (ApiServer::new(ctx).router(), store)
}

/// Sends one request and returns status plus parsed JSON body.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request build failed"),
        None => builder.body(Body::empty()).expect("request build failed"),
    };

    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read failed");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body was not JSON")
    };

    (status, json)
}

/// Registers a user through the API and returns its JSON representation.
pub async fn register_user(app: &Router, username: &str) -> Value {
    let (status, user) = request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "hunter2",
            "firstName": "Test",
            "lastName": "User",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    user
}

/// Logs the fixed admin in and returns a bearer token.
pub async fn admin_token(app: &Router) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/admin/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token missing").to_string()
}
