//! Route definitions for the `/activity` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::activity;
use crate::state::AppState;

/// Routes mounted at `/activity`.
///
/// ```text
/// POST   /  -> record an event
/// GET    /  -> list history (paginated)
/// DELETE /  -> clear history
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(activity::list)
            .post(activity::record)
            .delete(activity::clear),
    )
}
