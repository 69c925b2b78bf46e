//! Request throttling: store abstraction, policy wiring, admission layer.
//!
//! The window arithmetic lives in `gazette_core::throttle`; this module
//! owns where windows are kept and how decisions reach HTTP. Three traffic
//! classes are throttled independently: the whole API surface per caller
//! IP, and the session and activity endpoints per user.

pub mod layer;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use gazette_core::throttle::{ThrottleDecision, ThrottlePolicy};
use gazette_core::types::Timestamp;

use crate::config::ThrottleSettings;
use memory::MemoryThrottleStore;

/// Backing store for one policy's windows, keyed by caller identifier.
///
/// The default store is in-process ([`MemoryThrottleStore`]). The trait
/// keeps admission independent of where windows live, so a shared store can
/// back a multi-instance deployment without touching handlers.
#[async_trait]
pub trait ThrottleStore: Send + Sync {
    /// The policy this store enforces.
    fn policy(&self) -> &ThrottlePolicy;

    /// Count a hit for `identifier` at `now` and decide admission.
    async fn admit(&self, identifier: &str, now: Timestamp) -> ThrottleDecision;

    /// Discard identifiers whose windows have fully aged out. Returns how
    /// many were removed.
    async fn sweep(&self, now: Timestamp) -> usize;
}

/// The throttle stores for the three traffic classes.
pub struct ThrottleSet {
    /// Per-IP ceiling across the whole `/api/v1` surface.
    pub api: Arc<dyn ThrottleStore>,
    /// Per-user ceiling on session listing and revocation.
    pub sessions: Arc<dyn ThrottleStore>,
    /// Per-user ceiling on activity reads and writes.
    pub activity: Arc<dyn ThrottleStore>,
}

impl ThrottleSet {
    /// Build in-memory stores from the configured policies.
    pub fn in_memory(settings: &ThrottleSettings) -> Self {
        Self {
            api: Arc::new(MemoryThrottleStore::new(ThrottlePolicy::new(
                "api",
                settings.api.max_requests,
                Duration::seconds(settings.api.window_secs),
            ))),
            sessions: Arc::new(MemoryThrottleStore::new(ThrottlePolicy::new(
                "sessions",
                settings.sessions.max_requests,
                Duration::seconds(settings.sessions.window_secs),
            ))),
            activity: Arc::new(MemoryThrottleStore::new(ThrottlePolicy::new(
                "activity",
                settings.activity.max_requests,
                Duration::seconds(settings.activity.window_secs),
            ))),
        }
    }

    /// All stores, in a fixed order, for the periodic sweep.
    pub fn stores(&self) -> Vec<Arc<dyn ThrottleStore>> {
        vec![
            Arc::clone(&self.api),
            Arc::clone(&self.sessions),
            Arc::clone(&self.activity),
        ]
    }
}
