//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct HTTP
//! status code, error code, message, and client logout hint. They do NOT
//! need an HTTP server -- they call `IntoResponse` directly on `AppError`
//! values.

use axum::response::IntoResponse;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;

use gazette_api::error::AppError;
use gazette_core::error::CoreError;
use gazette_core::throttle::ThrottleDecision;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Session",
        key: "1.1.1.1|desktop".to_string(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Session 1.1.1.1|desktop not found");
    assert!(json.get("shouldLogout").is_none());
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400 with VALIDATION_ERROR code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("ip or device_type is required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "ip or device_type is required");
    assert!(json.get("shouldLogout").is_none());
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Unauthorized maps to 401 and hints against logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unauthorized_error_returns_401_without_logout_hint() {
    let err = AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
    // Ordinary auth failures must not trigger a client-side session wipe.
    assert_eq!(json["shouldLogout"], false);
}

// ---------------------------------------------------------------------------
// Test: CoreError::MalformedToken maps to 401 with MALFORMED_TOKEN code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_token_returns_401_with_distinct_code() {
    let err = AppError::Core(CoreError::MalformedToken(
        "Bearer credential is not a well-formed token".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "MALFORMED_TOKEN");
    assert_eq!(json["shouldLogout"], false);
}

// ---------------------------------------------------------------------------
// Test: CoreError::Revoked maps to 401 and tells the client to log out
// ---------------------------------------------------------------------------

#[tokio::test]
async fn revoked_error_returns_401_with_logout_hint() {
    let err = AppError::Core(CoreError::Revoked(
        "Session was logged out on another device".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "SESSION_REVOKED");
    assert_eq!(json["shouldLogout"], true);
}

// ---------------------------------------------------------------------------
// Test: CoreError::Forbidden maps to 403 with FORBIDDEN code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn forbidden_error_returns_403() {
    let err = AppError::Core(CoreError::Forbidden("Admin role required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["error"], "Admin role required");
}

// ---------------------------------------------------------------------------
// Test: CoreError::LookupFailed maps to 500 and sanitizes the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lookup_failed_returns_500_and_sanitizes() {
    let err = AppError::Core(CoreError::LookupFailed(
        "connection refused at 10.0.0.3:5432".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "LOOKUP_FAILED");

    let body_text = json.to_string();
    assert!(
        !body_text.contains("10.0.0.3"),
        "Lookup failure response must not leak connection details"
    );
    assert_eq!(json["error"], "A backing store could not be reached");
}

// ---------------------------------------------------------------------------
// Test: AppError::InternalError maps to 500 and sanitizes the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");

    // The response body must NOT contain the original error details.
    let body_text = json.to_string();
    assert!(
        !body_text.contains("secret"),
        "Internal error response must not leak sensitive details"
    );
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Internal maps to 500 and sanitizes like InternalError
// ---------------------------------------------------------------------------

#[tokio::test]
async fn core_internal_error_returns_500_and_sanitizes() {
    let err = AppError::Core(CoreError::Internal("panic stack trace here".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");

    let body_text = json.to_string();
    assert!(
        !body_text.contains("panic stack trace"),
        "Core internal error must not leak details"
    );
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: AppError::RateExceeded maps to 429 with headers and retry metadata
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rate_exceeded_returns_429_with_retry_metadata() {
    let reset = Utc::now() + Duration::seconds(30);
    let err = AppError::RateExceeded(ThrottleDecision {
        allowed: false,
        limit: 100,
        remaining: 0,
        reset,
    });

    let response = err.into_response();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, axum::http::StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["code"], "RATE_EXCEEDED");
    assert_eq!(json["error"], "Too many requests");

    let retry = json["retryAfterSecs"].as_i64().unwrap();
    assert!(retry >= 29 && retry <= 31, "retryAfterSecs should be ~30, got {retry}");

    assert_eq!(headers["x-ratelimit-limit"], "100");
    assert_eq!(headers["x-ratelimit-remaining"], "0");
    assert_eq!(
        headers["x-ratelimit-reset"],
        reset.timestamp().to_string().as_str()
    );
    assert!(headers.contains_key("retry-after"));
}
