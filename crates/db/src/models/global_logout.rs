//! Global logout (revocation marker) entity model.

use gazette_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A "log me out everywhere" marker. Immutable once created.
///
/// A bearer token is revoked when a row exists for its user whose
/// `logged_out_at` is at or after the token's issue time. Rows are never
/// deleted; a newer login simply carries a newer issue time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GlobalLogout {
    pub id: DbId,
    pub user_id: UserId,
    pub logged_out_at: Timestamp,
    pub created_at: Timestamp,
}
