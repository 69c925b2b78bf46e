use std::sync::Arc;

use crate::config::ServerConfig;
use crate::throttle::ThrottleSet;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gazette_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Throttle stores for the three traffic classes.
    pub throttles: Arc<ThrottleSet>,
}
