//! Backend liveness: a shared flag and the delayed startup probe that sets it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::backend::BackendClient;

/// Delay between server start and the first liveness probe.
pub const PROBE_DELAY: Duration = Duration::from_secs(1);

/// Whether the last probe reached the backend. Starts out `false`.
#[derive(Debug, Clone, Default)]
pub struct BackendStatus {
    reachable: Arc<AtomicBool>,
}

impl BackendStatus {
    pub fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::Acquire)
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::Release);
    }
}

/// Ping the backend once after `delay`, log the outcome and record it.
pub fn spawn_liveness_probe(
    client: BackendClient,
    delay: Duration,
    status: BackendStatus,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let reachable = match client.ping().await {
            Ok(()) => {
                info!(backend = %client.base_url(), "connected to notes backend");
                true
            }
            Err(e) => {
                warn!(backend = %client.base_url(), error = %e, "failed to connect to notes backend");
                false
            }
        };
        status.set_reachable(reachable);
        reachable
    })
}
