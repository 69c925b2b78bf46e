//! Handlers for the `/admin` moderation surface.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use gazette_core::types::{Timestamp, UserId};
use gazette_db::repositories::GlobalLogoutRepo;

use crate::error::AppResult;
use crate::handlers::sessions;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response payload for a forced logout.
#[derive(Debug, Serialize)]
pub struct ForcedLogout {
    pub user_id: UserId,
    pub closed_sessions: usize,
    pub logged_out_at: Timestamp,
}

/// POST /api/v1/admin/users/{user_id}/force-logout
///
/// Moderation-grade global logout: close the target user's open sessions
/// and write a revocation marker covering every token issued up to now.
/// The target's next authenticated request is rejected with
/// `SESSION_REVOKED`.
pub async fn force_logout(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<DataResponse<ForcedLogout>>> {
    let closed =
        sessions::close_open_sessions(&state.pool, &state.config.sessions, user_id).await?;

    let marker = GlobalLogoutRepo::insert(&state.pool, user_id, Utc::now()).await?;

    tracing::info!(
        admin_id = %admin.user_id,
        target = %user_id,
        closed,
        "Forced global logout"
    );

    Ok(Json(DataResponse {
        data: ForcedLogout {
            user_id,
            closed_sessions: closed,
            logged_out_at: marker.logged_out_at,
        },
    }))
}
