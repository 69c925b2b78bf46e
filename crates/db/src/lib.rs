//! Database access layer.
//!
//! Owns the connection pool, migrations, and the repository modules. The
//! schema is two append-only tables: `activity_events`, the log that
//! sessions are reconstructed from, and `global_logouts`, the revocation
//! markers consulted on every authenticated request.

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Connect to PostgreSQL with production pool settings.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await
}
