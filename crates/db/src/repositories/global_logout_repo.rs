//! Repository for the `global_logouts` table.

use gazette_core::types::{Timestamp, UserId};
use sqlx::PgPool;

use crate::models::global_logout::GlobalLogout;

/// Column list for `global_logouts` SELECT queries.
const COLUMNS: &str = "id, user_id, logged_out_at, created_at";

/// Provides insert and lookup operations for revocation markers.
pub struct GlobalLogoutRepo;

impl GlobalLogoutRepo {
    /// Record a "log out everywhere" marker effective at `logged_out_at`.
    pub async fn insert(
        pool: &PgPool,
        user_id: UserId,
        logged_out_at: Timestamp,
    ) -> Result<GlobalLogout, sqlx::Error> {
        let query = format!(
            "INSERT INTO global_logouts (user_id, logged_out_at) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GlobalLogout>(&query)
            .bind(user_id)
            .bind(logged_out_at)
            .fetch_one(pool)
            .await
    }

    /// Whether a marker exists that revokes tokens issued at `issued_at`.
    ///
    /// The comparison is inclusive: a marker stamped exactly at the token's
    /// issue time revokes it.
    pub async fn exists_since(
        pool: &PgPool,
        user_id: UserId,
        issued_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM global_logouts \
                WHERE user_id = $1 AND logged_out_at >= $2 \
             )",
        )
        .bind(user_id)
        .bind(issued_at)
        .fetch_one(pool)
        .await
    }
}
