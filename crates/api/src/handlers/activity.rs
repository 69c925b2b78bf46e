//! Handlers for the `/activity` resource.
//!
//! The activity log is the system's only persistent record of user
//! behavior. Login and logout rows double as the input to session
//! reconstruction, so clearing the log re-closes any sessions that were
//! open at the time of the wipe.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use gazette_core::error::CoreError;
use gazette_core::replay::reconstruct;
use gazette_db::models::activity::{ActivityEvent, ActivityKind, ActivityPage, NewActivityEvent};
use gazette_db::repositories::ActivityRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::user_agent;
use crate::handlers::sessions;
use crate::middleware::auth::AuthUser;
use crate::middleware::client_ip::ClientIp;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::throttle::layer::admit_user;

/// Longest accepted length for client-supplied context fields.
const MAX_FIELD_LEN: usize = 100;

/// Hard cap on page size for activity listings.
const MAX_PAGE_SIZE: i64 = 200;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /activity`.
///
/// The caller's IP and user agent are stamped by the server and cannot be
/// supplied here.
#[derive(Debug, Deserialize)]
pub struct RecordActivityRequest {
    pub kind: ActivityKind,
    pub location: Option<String>,
    pub platform: Option<String>,
    pub device_type: Option<String>,
}

/// Response payload for `DELETE /activity`.
#[derive(Debug, Serialize)]
pub struct ClearedHistory {
    pub removed: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/activity
///
/// Append one activity event. Login and logout events participate in
/// session reconstruction; the rest are plain history rows.
pub async fn record(
    State(state): State<AppState>,
    user: AuthUser,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    Json(input): Json<RecordActivityRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ActivityEvent>>)> {
    admit_user(state.throttles.activity.as_ref(), user.user_id).await?;

    validate_field("location", &input.location)?;
    validate_field("platform", &input.platform)?;
    validate_field("device_type", &input.device_type)?;

    let event = NewActivityEvent {
        kind: input.kind,
        ip,
        location: input.location,
        platform: input.platform,
        device_type: input.device_type,
        user_agent: user_agent(&headers),
    };
    let created = ActivityRepo::insert(&state.pool, user.user_id, &event).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/activity?limit=&offset=
///
/// The caller's history, newest first.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<ActivityPage>>> {
    admit_user(state.throttles.activity.as_ref(), user.user_id).await?;

    let (limit, offset) = params.clamp(MAX_PAGE_SIZE);
    let items = ActivityRepo::list_recent(&state.pool, user.user_id, limit, offset).await?;
    let total = ActivityRepo::count_for_user(&state.pool, user.user_id).await?;

    Ok(Json(DataResponse {
        data: ActivityPage { items, total },
    }))
}

/// DELETE /api/v1/activity
///
/// Erase the caller's history. Sessions that were open before the wipe
/// are re-closed with synthetic logouts so the sessions view cannot
/// resurrect them from rows written afterwards. The caller stays
/// authenticated; clearing history never writes a revocation marker.
pub async fn clear(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<ClearedHistory>>> {
    admit_user(state.throttles.activity.as_ref(), user.user_id).await?;

    let events =
        sessions::fetch_auth_events(&state.pool, &state.config.sessions, user.user_id).await?;
    let open = reconstruct(&events, None);

    let removed = ActivityRepo::delete_all_for_user(&state.pool, user.user_id).await?;

    let tombstones: Vec<NewActivityEvent> = open
        .iter()
        .map(|session| {
            NewActivityEvent::synthetic_logout(session.ip.clone(), session.device_type.clone())
        })
        .collect();
    ActivityRepo::insert_many(&state.pool, user.user_id, &tombstones).await?;

    tracing::info!(
        user_id = %user.user_id,
        removed,
        tombstones = tombstones.len(),
        "Activity history cleared"
    );

    Ok(Json(DataResponse {
        data: ClearedHistory { removed },
    }))
}

/// Reject overlong client-supplied context fields.
fn validate_field(name: &str, value: &Option<String>) -> Result<(), AppError> {
    if let Some(value) = value {
        if value.len() > MAX_FIELD_LEN {
            return Err(AppError::Core(CoreError::Validation(format!(
                "{name} must be at most {MAX_FIELD_LEN} characters"
            ))));
        }
    }
    Ok(())
}
