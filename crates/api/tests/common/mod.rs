//! Shared helpers for API integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use gazette_api::auth::jwt::{Claims, JwtConfig};
use gazette_api::config::{PolicySettings, ServerConfig, SessionSettings, ThrottleSettings};
use gazette_api::router::build_app_router;
use gazette_api::state::AppState;
use gazette_api::throttle::ThrottleSet;

/// Secret used to mint and verify tokens in tests.
pub const TEST_JWT_SECRET: &str = "integration-test-secret-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
///
/// Throttle ceilings are generous so ordinary tests never trip them;
/// throttle tests build their own config with tight limits via
/// [`build_test_app_with_config`].
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        sessions: SessionSettings {
            window_days: 30,
            event_limit: 500,
        },
        throttle: ThrottleSettings {
            api: PolicySettings {
                max_requests: 10_000,
                window_secs: 60,
            },
            sessions: PolicySettings {
                max_requests: 10_000,
                window_secs: 60,
            },
            activity: PolicySettings {
                max_requests: 10_000,
                window_secs: 60,
            },
            sweep_interval_secs: 300,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This uses the same [`build_app_router`] as `main.rs`, so integration
/// tests exercise the production middleware stack (CORS, request ID,
/// timeout, tracing, panic recovery, per-IP throttle).
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

/// Build the app with a custom config. Used by throttle tests to install
/// tight admission limits.
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let throttles = Arc::new(ThrottleSet::in_memory(&config.throttle));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        throttles,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Token minting
// ---------------------------------------------------------------------------

/// Mint a signed token for `user_id` the way the identity provider would,
/// with `iat` shifted by `issued_offset_secs` relative to now (negative
/// values put the issue instant in the past). The token itself stays
/// unexpired regardless of the offset.
pub fn mint_token(user_id: Uuid, issued_offset_secs: i64) -> String {
    mint_token_with_role(user_id, issued_offset_secs, None)
}

/// Mint a token carrying the admin role claim.
pub fn mint_admin_token(user_id: Uuid) -> String {
    mint_token_with_role(user_id, 0, Some("admin".to_string()))
}

pub fn mint_token_with_role(user_id: Uuid, issued_offset_secs: i64, role: Option<String>) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        exp: (now + Duration::hours(1)).timestamp(),
        iat: (now + Duration::seconds(issued_offset_secs)).timestamp(),
        role,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("token encoding should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request with no Authorization header.
pub async fn get(app: Router, path: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a bearer token and a spoofed client IP.
pub async fn get_auth_from_ip(app: Router, path: &str, token: &str, ip: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header("x-forwarded-for", ip)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and no Authorization header.
pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body, a bearer token, and a spoofed
/// client IP.
pub async fn post_json_auth_from_ip(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
    ip: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request with a bearer token.
pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Parse a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Database seeding
// ---------------------------------------------------------------------------

/// Insert an activity event with an explicit timestamp, bypassing the API.
/// Session reconstruction tests need precise event ordering.
pub async fn insert_event(
    pool: &PgPool,
    user_id: Uuid,
    kind: &str,
    ip: Option<&str>,
    device_type: Option<&str>,
    created_at: DateTime<Utc>,
) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO activity_events (user_id, kind, ip, device_type, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(user_id)
    .bind(kind)
    .bind(ip)
    .bind(device_type)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .expect("event insert should succeed")
}
