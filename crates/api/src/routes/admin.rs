//! Route definitions for the `/admin` moderation surface.

use axum::routing::post;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin` (admin role required).
///
/// ```text
/// POST /users/{user_id}/force-logout  -> revoke every token for a user
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/users/{user_id}/force-logout", post(admin::force_logout))
}
