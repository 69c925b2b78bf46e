/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// User identity as issued by the external identity provider (JWT `sub`).
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
