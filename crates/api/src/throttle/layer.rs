//! Admission middleware and throttle-state response headers.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use gazette_core::throttle::ThrottleDecision;
use gazette_core::types::UserId;

use crate::error::AppError;
use crate::middleware::client_ip::ClientIp;
use crate::state::AppState;

pub const HEADER_LIMIT: &str = "x-ratelimit-limit";
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RESET: &str = "x-ratelimit-reset";

/// Stamp throttle state onto response headers. `reset` is a Unix timestamp.
pub fn apply_headers(headers: &mut HeaderMap, decision: &ThrottleDecision) {
    headers.insert(HEADER_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(HEADER_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(HEADER_RESET, HeaderValue::from(decision.reset.timestamp()));
}

/// Per-IP admission across the `/api/v1` surface.
///
/// Applied with `axum::middleware::from_fn_with_state`. Admitted requests
/// proceed and their responses carry the throttle-state headers; rejected
/// requests are answered with 429 before reaching any route. Callers with
/// no derivable IP share one `"unknown"` window rather than bypassing the
/// policy.
pub async fn ip_throttle(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    request: Request,
    next: Next,
) -> Response {
    let identifier = ip.unwrap_or_else(|| "unknown".to_string());
    let decision = state.throttles.api.admit(&identifier, Utc::now()).await;

    if !decision.allowed {
        tracing::debug!(
            identifier = %identifier,
            policy = state.throttles.api.policy().name,
            "Request throttled"
        );
        return AppError::RateExceeded(decision).into_response();
    }

    let mut response = next.run(request).await;
    // A handler-level policy's 429 keeps its own header set.
    if response.status() != axum::http::StatusCode::TOO_MANY_REQUESTS {
        apply_headers(response.headers_mut(), &decision);
    }
    response
}

/// Per-user admission for a handler-level policy.
///
/// Returns the decision so a handler could surface it; on rejection the
/// error renders as 429 with retry metadata in headers and body.
pub async fn admit_user(
    store: &dyn super::ThrottleStore,
    user_id: UserId,
) -> Result<ThrottleDecision, AppError> {
    let decision = store.admit(&user_id.to_string(), Utc::now()).await;
    if decision.allowed {
        Ok(decision)
    } else {
        tracing::debug!(
            user_id = %user_id,
            policy = store.policy().name,
            "Request throttled"
        );
        Err(AppError::RateExceeded(decision))
    }
}
