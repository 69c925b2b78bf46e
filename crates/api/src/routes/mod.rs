pub mod activity;
pub mod admin;
pub mod auth;
pub mod health;
pub mod sessions;

use axum::middleware;
use axum::Router;

use crate::state::AppState;
use crate::throttle::layer::ip_throttle;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/session                        session validity check (GET)
/// /auth/logout                         close this device's session (POST)
/// /auth/logout-all                     global logout, revokes tokens (POST)
///
/// /sessions                            list open sessions (GET)
/// /sessions/revoke                     close one session by key (POST)
/// /sessions/revoke-others              close all but the current session (POST)
///
/// /activity                            record, list, clear (POST, GET, DELETE)
///
/// /admin/users/{user_id}/force-logout  forced global logout (POST, admin only)
/// ```
///
/// Every route here sits behind the per-IP admission layer, which stamps
/// `x-ratelimit-*` headers on each response and rejects over-limit
/// callers with 429 before any handler runs.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Session lifecycle (validity check, logout, logout-all).
        .nest("/auth", auth::router())
        // Reconstructed session views and revocation.
        .nest("/sessions", sessions::router())
        // Activity history (record, list, clear).
        .nest("/activity", activity::router())
        // Moderation surface (admin role required).
        .nest("/admin", admin::router())
        // Per-IP admission wraps the whole tree.
        .layer(middleware::from_fn_with_state(state, ip_throttle))
}
