//! The global-logout check applied to every verified token.
//!
//! A token is revoked when a `global_logouts` marker exists for its user
//! with `logged_out_at` at or after the token's issue time. The probe runs
//! on every authenticated request, so it is a single indexed EXISTS query.

use gazette_core::error::CoreError;
use gazette_core::types::{Timestamp, UserId};
use gazette_db::repositories::GlobalLogoutRepo;
use gazette_db::DbPool;

/// Whether a token issued at `issued_at` has been globally revoked.
///
/// A lookup failure is surfaced as [`CoreError::LookupFailed`]; the caller
/// decides the fallback. [`ensure_not_revoked`] applies the standard one.
pub async fn is_revoked(
    pool: &DbPool,
    user_id: UserId,
    issued_at: Timestamp,
) -> Result<bool, CoreError> {
    GlobalLogoutRepo::exists_since(pool, user_id, issued_at)
        .await
        .map_err(|e| CoreError::LookupFailed(format!("revocation lookup: {e}")))
}

/// Reject the request if the token has been globally revoked.
///
/// Fails open: when the marker store cannot be reached, the token is
/// honored, a warning is logged, and the request proceeds. A transient
/// outage must never present to users as "you have been logged out"; the
/// cost is that a genuinely revoked token keeps working until the store
/// recovers. The returned [`CoreError::Revoked`] is the only error in the
/// system that tells a client to discard its session.
pub async fn ensure_not_revoked(
    pool: &DbPool,
    user_id: UserId,
    issued_at: Timestamp,
) -> Result<(), CoreError> {
    match is_revoked(pool, user_id, issued_at).await {
        Ok(true) => Err(CoreError::Revoked(
            "Session was logged out on another device".into(),
        )),
        Ok(false) => Ok(()),
        Err(e) => {
            tracing::warn!(
                user_id = %user_id,
                error = %e,
                "Revocation lookup failed; honoring token"
            );
            Ok(())
        }
    }
}
