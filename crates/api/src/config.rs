use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Token verification configuration (identity-provider secret).
    pub jwt: JwtConfig,
    /// Session reconstruction bounds.
    pub sessions: SessionSettings,
    /// Request throttle policies and sweep cadence.
    pub throttle: ThrottleSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            sessions: SessionSettings::from_env(),
            throttle: ThrottleSettings::from_env(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session reconstruction settings
// ---------------------------------------------------------------------------

/// Bounds on the event history fed into session reconstruction.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// How many days of login/logout history count toward open sessions.
    /// Logins older than this are treated as expired.
    pub window_days: i64,
    /// Hard cap on events fetched per reconstruction call.
    pub event_limit: i64,
}

impl SessionSettings {
    /// Load session settings from environment variables.
    ///
    /// | Env Var               | Default |
    /// |-----------------------|---------|
    /// | `SESSION_WINDOW_DAYS` | `30`    |
    /// | `SESSION_EVENT_LIMIT` | `500`   |
    pub fn from_env() -> Self {
        Self {
            window_days: env_or("SESSION_WINDOW_DAYS", 30),
            event_limit: env_or("SESSION_EVENT_LIMIT", 500),
        }
    }
}

// ---------------------------------------------------------------------------
// Throttle settings
// ---------------------------------------------------------------------------

/// One throttle policy's knobs: hit ceiling and window width.
#[derive(Debug, Clone, Copy)]
pub struct PolicySettings {
    pub max_requests: u32,
    pub window_secs: i64,
}

/// Throttle policies for the three traffic classes, plus sweep cadence.
#[derive(Debug, Clone)]
pub struct ThrottleSettings {
    /// Per-IP ceiling across the whole `/api/v1` surface.
    pub api: PolicySettings,
    /// Per-user ceiling on session listing and revocation.
    pub sessions: PolicySettings,
    /// Per-user ceiling on activity reads and writes.
    pub activity: PolicySettings,
    /// How often idle windows are reclaimed, in seconds.
    pub sweep_interval_secs: u64,
}

impl ThrottleSettings {
    /// Load throttle settings from environment variables.
    ///
    /// | Env Var                        | Default |
    /// |--------------------------------|---------|
    /// | `THROTTLE_API_MAX`             | `100`   |
    /// | `THROTTLE_API_WINDOW_SECS`     | `900`   |
    /// | `THROTTLE_SESSIONS_MAX`        | `30`    |
    /// | `THROTTLE_SESSIONS_WINDOW_SECS`| `300`   |
    /// | `THROTTLE_ACTIVITY_MAX`        | `60`    |
    /// | `THROTTLE_ACTIVITY_WINDOW_SECS`| `60`    |
    /// | `THROTTLE_SWEEP_INTERVAL_SECS` | `300`   |
    pub fn from_env() -> Self {
        Self {
            api: PolicySettings {
                max_requests: env_or("THROTTLE_API_MAX", 100),
                window_secs: env_or("THROTTLE_API_WINDOW_SECS", 900),
            },
            sessions: PolicySettings {
                max_requests: env_or("THROTTLE_SESSIONS_MAX", 30),
                window_secs: env_or("THROTTLE_SESSIONS_WINDOW_SECS", 300),
            },
            activity: PolicySettings {
                max_requests: env_or("THROTTLE_ACTIVITY_MAX", 60),
                window_secs: env_or("THROTTLE_ACTIVITY_WINDOW_SECS", 60),
            },
            sweep_interval_secs: env_or("THROTTLE_SWEEP_INTERVAL_SECS", 300),
        }
    }
}

/// Read an env var and parse it, falling back to `default` when unset.
///
/// # Panics
///
/// Panics when the variable is set but does not parse; misconfiguration
/// should fail fast at startup.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be valid: {e}")),
        Err(_) => default,
    }
}
