//! Activity log entity models and DTOs.
//!
//! Models for the append-only activity trail. Activity events have no
//! `updated_at` field (immutable records). Login and logout rows double as
//! the source of truth for session reconstruction.

use gazette_core::replay::{AuthEvent, AuthEventKind};
use gazette_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Activity kinds
// ---------------------------------------------------------------------------

/// The classes of activity the log records.
///
/// `Login` and `Logout` participate in session reconstruction; the rest are
/// plain history entries shown on the activity page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Login,
    Logout,
    ArticleRead,
    Search,
    Bookmark,
}

impl ActivityKind {
    /// Stable string form stored in the `kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Login => "login",
            ActivityKind::Logout => "logout",
            ActivityKind::ArticleRead => "article_read",
            ActivityKind::Search => "search",
            ActivityKind::Bookmark => "bookmark",
        }
    }

    /// The replay-relevant kind, if this activity is a login or logout.
    pub fn auth_kind(&self) -> Option<AuthEventKind> {
        match self {
            ActivityKind::Login => Some(AuthEventKind::Login),
            ActivityKind::Logout => Some(AuthEventKind::Logout),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Activity event entity
// ---------------------------------------------------------------------------

/// A single activity log entry. Immutable once created (no updated_at).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityEvent {
    pub id: DbId,
    pub user_id: UserId,
    pub kind: String,
    pub ip: Option<String>,
    pub location: Option<String>,
    pub platform: Option<String>,
    pub device_type: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

impl ActivityEvent {
    /// View this row as a replay event. Returns `None` for kinds that do
    /// not participate in session reconstruction.
    pub fn to_auth_event(&self) -> Option<AuthEvent> {
        let kind = match self.kind.as_str() {
            "login" => AuthEventKind::Login,
            "logout" => AuthEventKind::Logout,
            _ => return None,
        };
        Some(AuthEvent {
            kind,
            ip: self.ip.clone(),
            location: self.location.clone(),
            device_type: self.device_type.clone(),
            user_agent: self.user_agent.clone(),
            created_at: self.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Create DTO (batch-friendly)
// ---------------------------------------------------------------------------

/// DTO for inserting a new activity event.
///
/// Designed for batch inserts -- every field except `kind` is optional.
/// Synthetic logout rows (clear-history, session revocation) are built
/// from these with only `kind`, `ip`, and `device_type` set.
#[derive(Debug, Clone, Deserialize)]
pub struct NewActivityEvent {
    pub kind: ActivityKind,
    pub ip: Option<String>,
    pub location: Option<String>,
    pub platform: Option<String>,
    pub device_type: Option<String>,
    pub user_agent: Option<String>,
}

impl NewActivityEvent {
    /// A synthetic logout closing the session identified by `ip` and
    /// `device_type`. Carries no other context.
    pub fn synthetic_logout(ip: Option<String>, device_type: Option<String>) -> Self {
        Self {
            kind: ActivityKind::Logout,
            ip,
            location: None,
            platform: None,
            device_type,
            user_agent: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Paginated response for activity queries.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityPage {
    pub items: Vec<ActivityEvent>,
    pub total: i64,
}
