use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use scrybe_api::auth::jwt::JwtConfig;
use scrybe_api::config::ServerConfig;
use scrybe_api::router::build_app_router;
use scrybe_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev
/// default) and a fixed JWT secret so tests can mint session tokens.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            expiry_secs: 3600,
        },
    }
}

/// Build the shared application state from the given pool.
///
/// Returned separately from the router so gateway tests can inspect the
/// notification bus behind it.
pub fn build_test_state(pool: PgPool) -> AppState {
    AppState::new(pool, test_config())
}

/// Build the full application router with the production middleware
/// stack, mirroring the construction in `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

/// Issue a session token for the given user/org against the test secret.
pub fn session_token(user_id: &str, organization_id: &str) -> String {
    scrybe_api::auth::jwt::create_token(&test_config().jwt, user_id, organization_id)
        .expect("token creation should succeed")
}

/// Send a GET request with no credentials.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a status code and return the JSON body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
