//! Periodic reclamation of idle throttle windows.
//!
//! Admission only ever touches the window being hit, so identifiers that
//! stop sending traffic would otherwise sit in the stores forever. This
//! task walks every store on a fixed interval and discards windows whose
//! hits have all aged out. Runs until `cancel` is triggered.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::throttle::ThrottleSet;

/// Run the sweep loop over all throttle stores.
pub async fn run(throttles: Arc<ThrottleSet>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Throttle sweep job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Throttle sweep job stopping");
                break;
            }
            _ = ticker.tick() => {
                let now = Utc::now();
                for store in throttles.stores() {
                    let removed = store.sweep(now).await;
                    if removed > 0 {
                        tracing::debug!(
                            policy = store.policy().name,
                            removed,
                            "Throttle sweep: reclaimed idle windows"
                        );
                    }
                }
            }
        }
    }
}
