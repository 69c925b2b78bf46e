//! In-process throttle store.

use std::collections::HashMap;

use async_trait::async_trait;
use gazette_core::throttle::{RateWindow, ThrottleDecision, ThrottlePolicy};
use gazette_core::types::Timestamp;
use tokio::sync::Mutex;

use super::ThrottleStore;

/// Per-identifier windows behind a single mutex.
///
/// Admission is one short critical section (prune + push on a `VecDeque`),
/// so a plain mutex over the whole map is enough at this service's traffic.
/// Entries accumulate for every identifier ever seen; the periodic sweep
/// keeps the map from growing without bound.
pub struct MemoryThrottleStore {
    policy: ThrottlePolicy,
    windows: Mutex<HashMap<String, RateWindow>>,
}

impl MemoryThrottleStore {
    pub fn new(policy: ThrottlePolicy) -> Self {
        Self {
            policy,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Number of identifiers currently tracked.
    pub async fn tracked(&self) -> usize {
        self.windows.lock().await.len()
    }
}

#[async_trait]
impl ThrottleStore for MemoryThrottleStore {
    fn policy(&self) -> &ThrottlePolicy {
        &self.policy
    }

    async fn admit(&self, identifier: &str, now: Timestamp) -> ThrottleDecision {
        let mut windows = self.windows.lock().await;
        let window = windows.entry(identifier.to_string()).or_default();
        window.admit(&self.policy, now)
    }

    async fn sweep(&self, now: Timestamp) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, window| !window.is_idle(&self.policy, now));
        before - windows.len()
    }
}
