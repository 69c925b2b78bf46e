//! Repository for the `activity_events` table.

use gazette_core::types::{Timestamp, UserId};
use sqlx::PgPool;

use crate::models::activity::{ActivityEvent, NewActivityEvent};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for `activity_events` SELECT queries.
const COLUMNS: &str = "\
    id, user_id, kind, ip, location, platform, \
    device_type, user_agent, created_at";

/// Column list for INSERT (excludes auto-generated `id`, `created_at`).
const INSERT_COLUMNS: &str = "\
    user_id, kind, ip, location, platform, device_type, user_agent";

/// Number of bind parameters per row in a batch insert.
const INSERT_PARAMS: u32 = 7;

// ---------------------------------------------------------------------------
// ActivityRepo
// ---------------------------------------------------------------------------

/// Provides insert and query operations for the activity log.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Insert a single activity event.
    pub async fn insert(
        pool: &PgPool,
        user_id: UserId,
        event: &NewActivityEvent,
    ) -> Result<ActivityEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_events ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityEvent>(&query)
            .bind(user_id)
            .bind(event.kind.as_str())
            .bind(&event.ip)
            .bind(&event.location)
            .bind(&event.platform)
            .bind(&event.device_type)
            .bind(&event.user_agent)
            .fetch_one(pool)
            .await
    }

    /// Batch insert multiple activity events for one user.
    ///
    /// Uses a single INSERT with multiple value rows for efficiency. Used
    /// for the synthetic logout batches written by clear-history and
    /// logout-everywhere.
    pub async fn insert_many(
        pool: &PgPool,
        user_id: UserId,
        events: &[NewActivityEvent],
    ) -> Result<Vec<ActivityEvent>, sqlx::Error> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        // Build a multi-row INSERT statement.
        let mut query = format!("INSERT INTO activity_events ({INSERT_COLUMNS}) VALUES ");
        let mut param_idx = 1u32;
        let mut first = true;

        for _ in events {
            if !first {
                query.push_str(", ");
            }
            first = false;
            query.push('(');
            for i in 0..INSERT_PARAMS {
                if i > 0 {
                    query.push_str(", ");
                }
                query.push_str(&format!("${param_idx}"));
                param_idx += 1;
            }
            query.push(')');
        }

        query.push_str(&format!(" RETURNING {COLUMNS}"));

        let mut q = sqlx::query_as::<_, ActivityEvent>(&query);
        for event in events {
            q = q
                .bind(user_id)
                .bind(event.kind.as_str())
                .bind(&event.ip)
                .bind(&event.location)
                .bind(&event.platform)
                .bind(&event.device_type)
                .bind(&event.user_agent);
        }

        q.fetch_all(pool).await
    }

    /// Fetch the login/logout events feeding session reconstruction, newest
    /// first, bounded by the reconstruction window and event cap.
    pub async fn list_auth_events(
        pool: &PgPool,
        user_id: UserId,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<ActivityEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_events \
             WHERE user_id = $1 \
               AND kind IN ('login', 'logout') \
               AND created_at >= $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3"
        );
        sqlx::query_as::<_, ActivityEvent>(&query)
            .bind(user_id)
            .bind(since)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// List a user's activity of every kind, newest first, paginated.
    pub async fn list_recent(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_events \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ActivityEvent>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a user's activity events (for pagination metadata).
    pub async fn count_for_user(pool: &PgPool, user_id: UserId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM activity_events WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Delete a user's entire activity history. Returns the number of rows
    /// removed.
    pub async fn delete_all_for_user(pool: &PgPool, user_id: UserId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM activity_events WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
