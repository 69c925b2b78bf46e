//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET  /session     -> session validity check
/// POST /logout      -> close this device's session
/// POST /logout-all  -> global logout (revokes every token)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", get(auth::session_check))
        .route("/logout", post(auth::logout))
        .route("/logout-all", post(auth::logout_all))
}
