//! Handlers for the `/sessions` resource.
//!
//! Sessions are never stored. Every request replays the caller's recent
//! login/logout history into the set of currently open sessions, so
//! revoking one appends a synthetic logout event rather than deleting a
//! row. See [`gazette_core::replay`] for the reconstruction rules.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use gazette_core::error::CoreError;
use gazette_core::replay::{reconstruct, session_key, AuthEvent, ReconstructedSession};
use gazette_core::types::UserId;
use gazette_db::models::activity::NewActivityEvent;
use gazette_db::repositories::ActivityRepo;
use gazette_db::DbPool;

use crate::config::SessionSettings;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::client_ip::ClientIp;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::throttle::layer::admit_user;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /sessions/revoke`.
///
/// `ip` and `device_type` together form the session key; at least one must
/// be present.
#[derive(Debug, Deserialize)]
pub struct RevokeSessionRequest {
    pub ip: Option<String>,
    pub device_type: Option<String>,
}

/// Response payload for bulk revocations.
#[derive(Debug, Serialize)]
pub struct RevokedCount {
    pub revoked: usize,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/sessions
///
/// Reconstruct the caller's open sessions from their activity history.
/// The session matching the caller's IP is flagged `is_current`.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    ClientIp(caller_ip): ClientIp,
) -> AppResult<Json<DataResponse<Vec<ReconstructedSession>>>> {
    admit_user(state.throttles.sessions.as_ref(), user.user_id).await?;

    let events = fetch_auth_events(&state.pool, &state.config.sessions, user.user_id).await?;
    let sessions = reconstruct(&events, caller_ip.as_deref());

    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/sessions/revoke
///
/// Close the open session identified by `ip` and `device_type` by
/// appending a synthetic logout. Returns 404 when no open session matches
/// the key, including sessions that were already closed.
pub async fn revoke(
    State(state): State<AppState>,
    user: AuthUser,
    ClientIp(caller_ip): ClientIp,
    Json(input): Json<RevokeSessionRequest>,
) -> AppResult<StatusCode> {
    admit_user(state.throttles.sessions.as_ref(), user.user_id).await?;

    let Some(key) = session_key(input.ip.as_deref(), input.device_type.as_deref()) else {
        return Err(AppError::Core(CoreError::Validation(
            "ip or device_type is required".to_string(),
        )));
    };

    let events = fetch_auth_events(&state.pool, &state.config.sessions, user.user_id).await?;
    let sessions = reconstruct(&events, caller_ip.as_deref());

    let target = sessions
        .into_iter()
        .find(|session| session.session_key == key)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            key,
        }))?;

    ActivityRepo::insert(
        &state.pool,
        user.user_id,
        &NewActivityEvent::synthetic_logout(target.ip.clone(), target.device_type.clone()),
    )
    .await?;

    tracing::info!(
        user_id = %user.user_id,
        session_key = %target.session_key,
        "Session revoked"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/revoke-others
///
/// Close every open session except the caller's current one. Sessions
/// whose IP does not match the caller's are tombstoned; when the caller's
/// IP is unknown, every open session is closed.
pub async fn revoke_others(
    State(state): State<AppState>,
    user: AuthUser,
    ClientIp(caller_ip): ClientIp,
) -> AppResult<Json<DataResponse<RevokedCount>>> {
    admit_user(state.throttles.sessions.as_ref(), user.user_id).await?;

    let events = fetch_auth_events(&state.pool, &state.config.sessions, user.user_id).await?;
    let sessions = reconstruct(&events, caller_ip.as_deref());

    let tombstones: Vec<NewActivityEvent> = sessions
        .iter()
        .filter(|session| !session.is_current)
        .map(|session| {
            NewActivityEvent::synthetic_logout(session.ip.clone(), session.device_type.clone())
        })
        .collect();
    let revoked = tombstones.len();

    ActivityRepo::insert_many(&state.pool, user.user_id, &tombstones).await?;

    tracing::info!(user_id = %user.user_id, revoked, "Other sessions revoked");

    Ok(Json(DataResponse {
        data: RevokedCount { revoked },
    }))
}

// ---------------------------------------------------------------------------
// Helpers shared with the auth and admin handlers
// ---------------------------------------------------------------------------

/// Fetch the replay-relevant events inside the reconstruction window,
/// newest first.
///
/// Unlike the revocation probe, a failed history lookup has no safe
/// fallback and surfaces as a server error.
pub(crate) async fn fetch_auth_events(
    pool: &DbPool,
    settings: &SessionSettings,
    user_id: UserId,
) -> Result<Vec<AuthEvent>, CoreError> {
    let since = Utc::now() - chrono::Duration::days(settings.window_days);
    let rows = ActivityRepo::list_auth_events(pool, user_id, since, settings.event_limit)
        .await
        .map_err(|e| CoreError::LookupFailed(format!("activity lookup: {e}")))?;
    Ok(rows.into_iter().filter_map(|row| row.to_auth_event()).collect())
}

/// Close every open session for `user_id` by appending synthetic logouts.
/// Returns the number of sessions closed.
pub(crate) async fn close_open_sessions(
    pool: &DbPool,
    settings: &SessionSettings,
    user_id: UserId,
) -> Result<usize, AppError> {
    let events = fetch_auth_events(pool, settings, user_id).await?;
    let sessions = reconstruct(&events, None);

    let tombstones: Vec<NewActivityEvent> = sessions
        .iter()
        .map(|session| {
            NewActivityEvent::synthetic_logout(session.ip.clone(), session.device_type.clone())
        })
        .collect();
    let closed = tombstones.len();

    ActivityRepo::insert_many(pool, user_id, &tombstones).await?;

    Ok(closed)
}
