use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use gazette_core::error::CoreError;
use gazette_core::throttle::ThrottleDecision;
use serde_json::json;

use crate::throttle::layer::{HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
/// Every 401 body carries a `shouldLogout` flag so clients can distinguish
/// "not authenticated" from "was authenticated, now forcibly logged out";
/// the flag is `true` only for [`CoreError::Revoked`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `gazette_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// A request rejected by a throttle policy. Not a fault: carries the
    /// window state so the response can tell the caller when to retry.
    #[error("Rate limit exceeded")]
    RateExceeded(ThrottleDecision),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::RateExceeded(decision) = &self {
            return rate_exceeded_response(decision);
        }

        let (status, code, message, should_logout) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} {key} not found"),
                    None,
                ),
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                    None,
                ),
                CoreError::Unauthorized(msg) => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    msg.clone(),
                    Some(false),
                ),
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None)
                }
                CoreError::MalformedToken(msg) => (
                    StatusCode::UNAUTHORIZED,
                    "MALFORMED_TOKEN",
                    msg.clone(),
                    Some(false),
                ),
                CoreError::Revoked(msg) => (
                    StatusCode::UNAUTHORIZED,
                    "SESSION_REVOKED",
                    msg.clone(),
                    Some(true),
                ),
                CoreError::LookupFailed(msg) => {
                    tracing::error!(error = %msg, "Lookup failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "LOOKUP_FAILED",
                        "A backing store could not be reached".to_string(),
                        None,
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                        None,
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => {
                let (status, code, message) = classify_sqlx_error(err);
                (status, code, message, None)
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }

            // Handled by the early return above.
            AppError::RateExceeded(_) => unreachable!(),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(flag) = should_logout {
            body["shouldLogout"] = json!(flag);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Build the 429 response: retry metadata in both headers and body.
fn rate_exceeded_response(decision: &ThrottleDecision) -> Response {
    let retry_after = decision.retry_after_secs(Utc::now());

    let body = json!({
        "error": "Too many requests",
        "code": "RATE_EXCEEDED",
        "retryAfterSecs": retry_after,
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, axum::Json(body)).into_response();
    let headers = response.headers_mut();
    headers.insert(HEADER_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(HEADER_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(HEADER_RESET, HeaderValue::from(decision.reset.timestamp()));
    headers.insert("retry-after", HeaderValue::from(retry_after));
    response
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
