//! Handlers for the `/auth` resource.
//!
//! Token issuance lives with the identity provider; these endpoints cover
//! the rest of the session lifecycle: validity checks, single-device
//! logout, and the global logout that revokes every outstanding token.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use gazette_core::types::{Timestamp, UserId};
use gazette_db::models::activity::{ActivityKind, NewActivityEvent};
use gazette_db::repositories::{ActivityRepo, GlobalLogoutRepo};

use crate::error::AppResult;
use crate::handlers::sessions;
use crate::middleware::auth::AuthUser;
use crate::middleware::client_ip::ClientIp;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/logout`. Send `{}` when the device type is
/// unknown.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    /// Device half of the session key; pairs with the caller's IP.
    pub device_type: Option<String>,
}

/// Session status payload for `GET /auth/session`.
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub user_id: UserId,
    pub issued_at: Timestamp,
    #[serde(rename = "shouldLogout")]
    pub should_logout: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/auth/session
///
/// Confirm that the presented token is still honored. Reaching this
/// handler means the extractor found no newer global-logout marker, so
/// `shouldLogout` is always `false` here; the `true` case travels on the
/// 401 `SESSION_REVOKED` rejection body.
pub async fn session_check(user: AuthUser) -> AppResult<Json<DataResponse<SessionStatus>>> {
    Ok(Json(DataResponse {
        data: SessionStatus {
            authenticated: true,
            user_id: user.user_id,
            issued_at: user.issued_at,
            should_logout: false,
        },
    }))
}

/// POST /api/v1/auth/logout
///
/// Close the calling device's session by recording a logout event. The
/// token itself stays valid; single-device logout is an activity-log
/// operation, not a revocation, and clients discard the token locally.
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    Json(input): Json<LogoutRequest>,
) -> AppResult<StatusCode> {
    let event = NewActivityEvent {
        kind: ActivityKind::Logout,
        ip,
        location: None,
        platform: None,
        device_type: input.device_type,
        user_agent: user_agent(&headers),
    };
    ActivityRepo::insert(&state.pool, user.user_id, &event).await?;

    tracing::info!(user_id = %user.user_id, "User logged out");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/logout-all
///
/// Log the user out everywhere: close every open session in the activity
/// log, then write a global-logout marker that revokes all tokens issued
/// up to now, including the one authorizing this request.
pub async fn logout_all(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    let closed =
        sessions::close_open_sessions(&state.pool, &state.config.sessions, user.user_id).await?;

    GlobalLogoutRepo::insert(&state.pool, user.user_id, Utc::now()).await?;

    tracing::info!(user_id = %user.user_id, closed, "Global logout recorded");

    Ok(StatusCode::NO_CONTENT)
}

/// Extract the `user-agent` header as an owned string, dropping values
/// that are not valid UTF-8.
pub(crate) fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}
