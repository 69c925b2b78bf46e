//! Route definitions for the `/sessions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET  /               -> list open sessions (reconstructed)
/// POST /revoke         -> close one session by key
/// POST /revoke-others  -> close all but the current session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sessions::list))
        .route("/revoke", post(sessions::revoke))
        .route("/revoke-others", post(sessions::revoke_others))
}
